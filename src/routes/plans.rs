use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::NaiveDate;

use crate::{
    dto::plans::{DietPlanDto, GeneratePlanRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::DietPlan,
    response::ApiResponse,
    services::plan_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_plan))
        .route("/{date}", get(get_plan))
}

#[utoipa::path(
    post,
    path = "/api/plans/generate",
    request_body = GeneratePlanRequest,
    responses(
        (status = 200, description = "Plan generated", body = ApiResponse<DietPlan>),
        (status = 400, description = "Fewer than three menus available"),
    ),
    security(("bearer_auth" = [])),
    tag = "Diet plans"
)]
pub async fn generate_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<GeneratePlanRequest>,
) -> AppResult<Json<ApiResponse<DietPlan>>> {
    let resp = plan_service::generate_plan(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/plans/{date}",
    params(
        ("date" = String, Path, description = "Plan date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Plan for the day", body = ApiResponse<DietPlanDto>),
        (status = 404, description = "No plan for that day"),
    ),
    security(("bearer_auth" = [])),
    tag = "Diet plans"
)]
pub async fn get_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<ApiResponse<DietPlanDto>>> {
    let resp = plan_service::get_plan(&state, &user, date).await?;
    Ok(Json(resp))
}
