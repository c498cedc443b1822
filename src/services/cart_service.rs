use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    audit::log_audit,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, Ingredient, MenuTemplate},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    dto::cart::{AddToCartRequest, CartItemDto, CartList},
};

pub async fn list_cart(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CartList>> {
    let (page, limit, offset) = pagination.normalize();
    let rows: Vec<CartItem> = sqlx::query_as(
        r#"
        SELECT * FROM cart_items
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&state.pool)
        .await?;

    let menu_ids: Vec<Uuid> = rows.iter().map(|r| r.menu_id).collect();
    let menus: Vec<MenuTemplate> =
        sqlx::query_as("SELECT * FROM menu_templates WHERE id = ANY($1)")
            .bind(&menu_ids)
            .fetch_all(&state.pool)
            .await?;
    let mut by_id: HashMap<Uuid, MenuTemplate> =
        menus.into_iter().map(|m| (m.id, m)).collect();

    let items = rows
        .into_iter()
        .filter_map(|row| {
            by_id.remove(&row.menu_id).map(|menu| CartItemDto {
                id: row.id,
                menu,
                quantity: row.quantity,
                addon_ingredient_id: row.addon_ingredient_id,
            })
        })
        .collect();

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("OK", CartList { items }, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let menu: Option<MenuTemplate> =
        sqlx::query_as("SELECT * FROM menu_templates WHERE id = $1 AND active = TRUE")
            .bind(payload.menu_id)
            .fetch_optional(&state.pool)
            .await?;
    let menu = match menu {
        Some(m) => m,
        None => return Err(AppError::BadRequest("menu not found".to_string())),
    };

    if let Some(addon_id) = payload.addon_ingredient_id {
        // Only the mixed package allows a single add-on ingredient.
        if menu.template_type != "mixed_package" {
            return Err(AppError::BadRequest(
                "this menu type does not allow an add-on".to_string(),
            ));
        }
        let addon: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
            .bind(addon_id)
            .fetch_optional(&state.pool)
            .await?;
        if addon.is_none() {
            return Err(AppError::BadRequest("add-on ingredient not found".to_string()));
        }
    }

    let exist: Option<CartItem> = sqlx::query_as(
        r#"
        SELECT * FROM cart_items
        WHERE user_id = $1 AND menu_id = $2
          AND addon_ingredient_id IS NOT DISTINCT FROM $3
        "#,
    )
    .bind(user.user_id)
    .bind(payload.menu_id)
    .bind(payload.addon_ingredient_id)
    .fetch_optional(&state.pool)
    .await?;

    let cart_item = if let Some(item) = exist {
        sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantity = $3
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(user.user_id)
        .bind(payload.quantity)
        .fetch_one(&state.pool)
        .await?
    } else {
        sqlx::query_as(
            r#"
            INSERT INTO cart_items (id, user_id, menu_id, quantity, addon_ingredient_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.user_id)
        .bind(payload.menu_id)
        .bind(payload.quantity)
        .bind(payload.addon_ingredient_id)
        .fetch_one(&state.pool)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "menu_id": payload.menu_id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", cart_item, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
