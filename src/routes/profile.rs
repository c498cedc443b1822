use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    dto::profile::UpdateProfileRequest,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::UserProfile,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/", put(update_profile))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<UserProfile>),
        (status = 404, description = "Profile not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let profile =
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user.user_id)
            .fetch_optional(&state.pool)
            .await?;
    let profile = match profile {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Profile", profile, None)))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<UserProfile>)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let existing =
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user.user_id)
            .fetch_optional(&state.pool)
            .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let profile: UserProfile = sqlx::query_as(
        r#"
        UPDATE user_profiles
        SET name = $2, current_weight_kg = $3, target_weight_kg = $4,
            diet_goal = $5, allergies = $6, daily_calorie_target = $7,
            updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.current_weight_kg.or(existing.current_weight_kg))
    .bind(payload.target_weight_kg.or(existing.target_weight_kg))
    .bind(payload.diet_goal.or(existing.diet_goal))
    .bind(payload.allergies.unwrap_or(existing.allergies))
    .bind(payload.daily_calorie_target.or(existing.daily_calorie_target))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Profile updated",
        profile,
        Some(Meta::empty()),
    )))
}
