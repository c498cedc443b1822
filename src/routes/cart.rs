use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartItem,
    response::ApiResponse,
    routes::params::Pagination,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list))
        .route("/", post(add_to_cart))
        .route("/{id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Cart contents", body = ApiResponse<CartList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::list_cart(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartItem>),
        (status = 400, description = "Invalid quantity or menu"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID")
    ),
    responses(
        (status = 200, description = "Item removed"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_from_cart(&state, &user, id).await?;
    Ok(Json(resp))
}
