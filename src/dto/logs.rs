use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{DailyLog, MealEntry};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMealRequest {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    /// manual, diet_plan or purchase.
    #[serde(default = "default_source")]
    pub source: String,
    pub meal_slot: Option<String>,
    pub order_id: Option<Uuid>,
    pub order_item_index: Option<i32>,
}

fn default_source() -> String {
    "manual".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsumedOrderItem {
    pub order_id: Uuid,
    pub item_index: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayLogView {
    pub log: Option<DailyLog>,
    pub entries: Vec<MealEntry>,
    /// Diet-plan slots referenced by an entry today (derived, never stored).
    pub consumed_plan_slots: Vec<String>,
    /// Purchased order items referenced by an entry today.
    pub consumed_order_items: Vec<ConsumedOrderItem>,
}
