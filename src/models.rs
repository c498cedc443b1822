use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::nutrition::Nutrition;

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub name: String,
    pub current_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub diet_goal: Option<String>,
    pub allergies: String,
    pub daily_calorie_target: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub serving_weight: f64,
    pub serving_unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn nutrition(&self) -> Nutrition {
        Nutrition::new(self.calories, self.protein, self.carbs, self.fats)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct MenuTemplate {
    pub id: Uuid,
    pub name: String,
    pub template_type: String,
    pub base_price: i64,
    pub price_min: i64,
    pub price_max: i64,
    /// Map of category key to `{required, multi_select, options}`.
    #[schema(value_type = Object)]
    pub components: serde_json::Value,
    pub low_carb: bool,
    pub high_protein: bool,
    pub vegetarian: bool,
    pub keto: bool,
    pub diet_price_add_min: i64,
    pub diet_price_add_max: i64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuTemplate {
    pub fn nutrition(&self) -> Nutrition {
        Nutrition::new(self.calories, self.protein, self.carbs, self.fats)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct FitnessVideo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub category: String,
    pub difficulty: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub instructor: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub menu_id: Uuid,
    pub quantity: i32,
    pub addon_ingredient_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub total: i64,
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
    pub payment_token: Option<String>,
    pub payment_order_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_id: Uuid,
    pub menu_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub addon_ingredient_id: Option<Uuid>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MealEntry {
    pub id: Uuid,
    pub daily_log_id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub source: String,
    pub meal_slot: Option<String>,
    pub order_id: Option<Uuid>,
    pub order_item_index: Option<i32>,
    pub logged_at: DateTime<Utc>,
}

impl MealEntry {
    pub fn nutrition(&self) -> Nutrition {
        Nutrition::new(self.calories, self.protein, self.carbs, self.fats)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DietPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_date: NaiveDate,
    pub goal: String,
    #[schema(value_type = Object)]
    pub breakfast: serde_json::Value,
    #[schema(value_type = Object)]
    pub lunch: serde_json::Value,
    #[schema(value_type = Object)]
    pub dinner: serde_json::Value,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
    pub created_at: DateTime<Utc>,
}

/// Ingredient categories accepted by the admin CRUD.
pub const INGREDIENT_CATEGORIES: [&str; 7] = [
    "rice_carb",
    "animal_protein",
    "plant_protein",
    "vegetable",
    "fruit",
    "snack",
    "drink",
];

/// Menu template types.
pub const TEMPLATE_TYPES: [&str; 2] = ["mixed_package", "snack_box"];

/// Order status values and the meal-entry source tags.
pub const ORDER_STATUSES: [&str; 5] = [
    "pending",
    "pending_payment",
    "paid",
    "failed",
    "cancelled",
];

pub const MEAL_SOURCES: [&str; 3] = ["manual", "diet_plan", "purchase"];
