use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{domain::planner::DietGoal, models::DietPlan};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePlanRequest {
    pub goal: DietGoal,
    /// Defaults to today when omitted.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DietPlanDto {
    pub plan: DietPlan,
    /// Slots already logged to the nutrition ledger for that day.
    pub consumed_slots: Vec<String>,
}
