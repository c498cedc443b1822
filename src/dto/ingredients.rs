use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Ingredient;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub serving_weight: f64,
    #[serde(default = "default_unit")]
    pub serving_unit: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

fn default_unit() -> String {
    "g".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIngredientRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub serving_weight: Option<f64>,
    pub serving_unit: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientList {
    pub items: Vec<Ingredient>,
}
