pub mod cart_items;
pub mod daily_logs;
pub mod diet_plans;
pub mod meal_entries;
pub mod menu_templates;
pub mod order_items;
pub mod orders;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use daily_logs::Entity as DailyLogs;
pub use diet_plans::Entity as DietPlans;
pub use meal_entries::Entity as MealEntries;
pub use menu_templates::Entity as MenuTemplates;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
