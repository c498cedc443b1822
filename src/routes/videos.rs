use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::videos::VideoList,
    error::{AppError, AppResult},
    models::FitnessVideo,
    response::{ApiResponse, Meta},
    routes::params::VideoQuery,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos))
        .route("/{id}", get(get_video))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("difficulty" = Option<String>, Query, description = "Filter by difficulty"),
        ("q" = Option<String>, Query, description = "Substring match on title or instructor"),
    ),
    responses(
        (status = 200, description = "List fitness videos", body = ApiResponse<VideoList>)
    ),
    tag = "Videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> AppResult<Json<ApiResponse<VideoList>>> {
    let (page, limit, offset) = query.pagination.normalize();
    let items: Vec<FitnessVideo> = sqlx::query_as(
        r#"
        SELECT * FROM fitness_videos
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR difficulty = $2)
          AND ($3::text IS NULL
               OR title ILIKE '%' || $3 || '%'
               OR instructor ILIKE '%' || $3 || '%')
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(&query.category)
    .bind(&query.difficulty)
    .bind(&query.q)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT count(*) FROM fitness_videos
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR difficulty = $2)
          AND ($3::text IS NULL
               OR title ILIKE '%' || $3 || '%'
               OR instructor ILIKE '%' || $3 || '%')
        "#,
    )
    .bind(&query.category)
    .bind(&query.difficulty)
    .bind(&query.q)
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(Json(ApiResponse::success(
        "Videos",
        VideoList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Get video", body = ApiResponse<FitnessVideo>),
        (status = 404, description = "Video not found"),
    ),
    tag = "Videos"
)]
pub async fn get_video(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<FitnessVideo>>> {
    let result = sqlx::query_as::<_, FitnessVideo>("SELECT * FROM fitness_videos WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(v) => v,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Video", result, None)))
}
