use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::FitnessVideo;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    pub video_url: String,
    pub category: String,
    pub description: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub calories_burned: i32,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub rating: f64,
}

fn default_difficulty() -> String {
    "beginner".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub instructor: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoList {
    pub items: Vec<FitnessVideo>,
}
