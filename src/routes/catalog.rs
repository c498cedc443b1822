use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{ingredients::IngredientList, menus::MenuList},
    error::{AppError, AppResult},
    models::{Ingredient, MenuTemplate},
    response::{ApiResponse, Meta},
    routes::params::{IngredientQuery, MenuQuery},
    state::AppState,
};

pub fn menu_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menus))
        .route("/{id}", get(get_menu))
}

pub fn ingredient_router() -> Router<AppState> {
    Router::new().route("/", get(list_ingredients))
}

#[utoipa::path(
    get,
    path = "/api/menus",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("template_type" = Option<String>, Query, description = "mixed_package or snack_box"),
        ("q" = Option<String>, Query, description = "Substring match on name"),
    ),
    responses(
        (status = 200, description = "List active menus", body = ApiResponse<MenuList>)
    ),
    tag = "Catalog"
)]
pub async fn list_menus(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let (page, limit, offset) = query.pagination.normalize();
    let items: Vec<MenuTemplate> = sqlx::query_as(
        r#"
        SELECT * FROM menu_templates
        WHERE active = TRUE
          AND ($1::text IS NULL OR template_type = $1)
          AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(&query.template_type)
    .bind(&query.q)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT count(*) FROM menu_templates
        WHERE active = TRUE
          AND ($1::text IS NULL OR template_type = $1)
          AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(&query.template_type)
    .bind(&query.q)
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(Json(ApiResponse::success(
        "Menus",
        MenuList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/menus/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu ID")
    ),
    responses(
        (status = 200, description = "Get menu", body = ApiResponse<MenuTemplate>),
        (status = 404, description = "Menu not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_menu(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MenuTemplate>>> {
    let result = sqlx::query_as::<_, MenuTemplate>("SELECT * FROM menu_templates WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Menu", result, None)))
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("q" = Option<String>, Query, description = "Substring match on name"),
    ),
    responses(
        (status = 200, description = "List ingredients", body = ApiResponse<IngredientList>)
    ),
    tag = "Catalog"
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> AppResult<Json<ApiResponse<IngredientList>>> {
    let (page, limit, offset) = query.pagination.normalize();
    let items: Vec<Ingredient> = sqlx::query_as(
        r#"
        SELECT * FROM ingredients
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
        ORDER BY name
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(&query.category)
    .bind(&query.q)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT count(*) FROM ingredients
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(&query.category)
    .bind(&query.q)
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(Json(ApiResponse::success(
        "Ingredients",
        IngredientList { items },
        Some(meta),
    )))
}
