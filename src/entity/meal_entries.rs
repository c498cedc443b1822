use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meal_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub logged_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::daily_logs::Entity",
        from = "Column::DailyLogId",
        to = "super::daily_logs::Column::Id"
    )]
    DailyLogs,
}

impl Related<super::daily_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
