use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    dto::logs::{CreateMealRequest, DayLogView, UpdateMealRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{DailyLog, MealEntry},
    response::ApiResponse,
    services::ledger_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{date}", get(day_view))
        .route("/{date}/meals", post(add_meal))
        .route("/{date}/meals/{id}", put(update_meal))
        .route("/{date}/meals/{id}", delete(delete_meal))
}

#[utoipa::path(
    get,
    path = "/api/logs/{date}",
    params(
        ("date" = String, Path, description = "Log date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Daily log with entries", body = ApiResponse<DayLogView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Nutrition log"
)]
pub async fn day_view(
    State(state): State<AppState>,
    user: AuthUser,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<ApiResponse<DayLogView>>> {
    let resp = ledger_service::day_view(&state, &user, date).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/logs/{date}/meals",
    params(
        ("date" = String, Path, description = "Log date (YYYY-MM-DD)")
    ),
    request_body = CreateMealRequest,
    responses(
        (status = 200, description = "Meal logged", body = ApiResponse<MealEntry>),
        (status = 400, description = "Missing name or invalid source"),
    ),
    security(("bearer_auth" = [])),
    tag = "Nutrition log"
)]
pub async fn add_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(date): Path<NaiveDate>,
    Json(payload): Json<CreateMealRequest>,
) -> AppResult<Json<ApiResponse<MealEntry>>> {
    let resp = ledger_service::add_meal(&state, &user, date, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/logs/{date}/meals/{id}",
    params(
        ("date" = String, Path, description = "Log date (YYYY-MM-DD)"),
        ("id" = Uuid, Path, description = "Meal entry ID"),
    ),
    request_body = UpdateMealRequest,
    responses(
        (status = 200, description = "Meal updated", body = ApiResponse<MealEntry>),
        (status = 404, description = "No such entry for that day"),
    ),
    security(("bearer_auth" = [])),
    tag = "Nutrition log"
)]
pub async fn update_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Path((date, id)): Path<(NaiveDate, Uuid)>,
    Json(payload): Json<UpdateMealRequest>,
) -> AppResult<Json<ApiResponse<MealEntry>>> {
    let resp = ledger_service::update_meal(&state, &user, date, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/logs/{date}/meals/{id}",
    params(
        ("date" = String, Path, description = "Log date (YYYY-MM-DD)"),
        ("id" = Uuid, Path, description = "Meal entry ID"),
    ),
    responses(
        (status = 200, description = "Meal removed, updated totals returned", body = ApiResponse<DailyLog>),
        (status = 404, description = "No such entry for that day"),
    ),
    security(("bearer_auth" = [])),
    tag = "Nutrition log"
)]
pub async fn delete_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Path((date, id)): Path<(NaiveDate, Uuid)>,
) -> AppResult<Json<ApiResponse<DailyLog>>> {
    let resp = ledger_service::delete_meal(&state, &user, date, id).await?;
    Ok(Json(resp))
}
