use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub current_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub diet_goal: Option<String>,
    pub allergies: Option<String>,
    pub daily_calorie_target: Option<i32>,
}
