use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{
        ingredients::{CreateIngredientRequest, UpdateIngredientRequest},
        menus::{CreateMenuRequest, UpdateMenuRequest},
        orders::OrderList,
        videos::{CreateVideoRequest, UpdateVideoRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{FitnessVideo, Ingredient, MenuTemplate, Order},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingredients", post(create_ingredient))
        .route("/ingredients/{id}", put(update_ingredient))
        .route("/ingredients/{id}", delete(delete_ingredient))
        .route("/menus", post(create_menu))
        .route("/menus/{id}", put(update_menu))
        .route("/menus/{id}", delete(delete_menu))
        .route("/videos", post(create_video))
        .route("/videos/{id}", put(update_video))
        .route("/videos/{id}", delete(delete_video))
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}/status", patch(update_order_status))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 200, description = "Ingredient created", body = ApiResponse<Ingredient>),
        (status = 400, description = "Invalid category or missing name"),
        (status = 403, description = "Admin role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_ingredient(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateIngredientRequest>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let resp = admin_service::create_ingredient(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/ingredients/{id}",
    params(("id" = Uuid, Path, description = "Ingredient ID")),
    request_body = UpdateIngredientRequest,
    responses(
        (status = 200, description = "Ingredient updated", body = ApiResponse<Ingredient>),
        (status = 404, description = "Ingredient not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_ingredient(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIngredientRequest>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let resp = admin_service::update_ingredient(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/ingredients/{id}",
    params(("id" = Uuid, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient deleted"),
        (status = 404, description = "Ingredient not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_ingredient(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menus",
    request_body = CreateMenuRequest,
    responses(
        (status = 200, description = "Menu created", body = ApiResponse<MenuTemplate>),
        (status = 400, description = "Invalid template type or missing name"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMenuRequest>,
) -> AppResult<Json<ApiResponse<MenuTemplate>>> {
    let resp = admin_service::create_menu(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Menu updated, nutrition recomputed", body = ApiResponse<MenuTemplate>),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuRequest>,
) -> AppResult<Json<ApiResponse<MenuTemplate>>> {
    let resp = admin_service::update_menu(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu deleted"),
        (status = 404, description = "Menu not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_menu(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 200, description = "Video created", body = ApiResponse<FitnessVideo>),
        (status = 400, description = "Missing title or video_url"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_video(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateVideoRequest>,
) -> AppResult<Json<ApiResponse<FitnessVideo>>> {
    let resp = admin_service::create_video(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = ApiResponse<FitnessVideo>),
        (status = 404, description = "Video not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVideoRequest>,
) -> AppResult<Json<ApiResponse<FitnessVideo>>> {
    let resp = admin_service::update_video(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted"),
        (status = 404, description = "Video not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_video(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Admin role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload.status).await?;
    Ok(Json(resp))
}
