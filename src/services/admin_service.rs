use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::nutrition::{self, Nutrition},
    dto::{
        ingredients::{CreateIngredientRequest, UpdateIngredientRequest},
        menus::{ComponentMap, CreateMenuRequest, UpdateMenuRequest},
        orders::OrderList,
        videos::{CreateVideoRequest, UpdateVideoRequest},
    },
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{
        FitnessVideo, INGREDIENT_CATEGORIES, Ingredient, MenuTemplate, ORDER_STATUSES, Order,
        TEMPLATE_TYPES,
    },
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::order_from_entity,
    state::AppState,
};

// --- ingredients ---------------------------------------------------------

pub async fn create_ingredient(
    state: &AppState,
    user: &AuthUser,
    payload: CreateIngredientRequest,
) -> AppResult<ApiResponse<Ingredient>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    validate_category(&payload.category)?;

    let ingredient: Ingredient = sqlx::query_as(
        r#"
        INSERT INTO ingredients
            (id, name, category, serving_weight, serving_unit,
             calories, protein, carbs, fats, image_url, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name)
    .bind(payload.category)
    .bind(payload.serving_weight)
    .bind(payload.serving_unit)
    .bind(payload.calories)
    .bind(payload.protein)
    .bind(payload.carbs)
    .bind(payload.fats)
    .bind(payload.image_url)
    .bind(payload.description)
    .fetch_one(&state.pool)
    .await?;

    audit(state, user, "ingredient_create", "ingredients", ingredient.id).await;
    Ok(ApiResponse::success(
        "Ingredient created",
        ingredient,
        Some(Meta::empty()),
    ))
}

pub async fn update_ingredient(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateIngredientRequest,
) -> AppResult<ApiResponse<Ingredient>> {
    ensure_admin(user)?;

    let existing: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let category = payload.category.unwrap_or(existing.category);
    validate_category(&category)?;

    // Merge changed fields; created_at is never touched.
    let ingredient: Ingredient = sqlx::query_as(
        r#"
        UPDATE ingredients
        SET name = $2, category = $3, serving_weight = $4, serving_unit = $5,
            calories = $6, protein = $7, carbs = $8, fats = $9,
            image_url = $10, description = $11, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name.unwrap_or(existing.name))
    .bind(category)
    .bind(payload.serving_weight.unwrap_or(existing.serving_weight))
    .bind(payload.serving_unit.unwrap_or(existing.serving_unit))
    .bind(payload.calories.unwrap_or(existing.calories))
    .bind(payload.protein.unwrap_or(existing.protein))
    .bind(payload.carbs.unwrap_or(existing.carbs))
    .bind(payload.fats.unwrap_or(existing.fats))
    .bind(payload.image_url.or(existing.image_url))
    .bind(payload.description.or(existing.description))
    .fetch_one(&state.pool)
    .await?;

    audit(state, user, "ingredient_update", "ingredients", id).await;
    Ok(ApiResponse::success(
        "Ingredient updated",
        ingredient,
        Some(Meta::empty()),
    ))
}

pub async fn delete_ingredient(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    // No cascade: menu templates keep any stale reference until re-saved.
    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    audit(state, user, "ingredient_delete", "ingredients", id).await;
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// --- menu templates ------------------------------------------------------

pub async fn create_menu(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuRequest,
) -> AppResult<ApiResponse<MenuTemplate>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    validate_template_type(&payload.template_type)?;

    let aggregate =
        aggregate_nutrition(state, &payload.template_type, &payload.components).await?;
    let components = serde_json::to_value(&payload.components)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let menu: MenuTemplate = sqlx::query_as(
        r#"
        INSERT INTO menu_templates
            (id, name, template_type, base_price, price_min, price_max, components,
             low_carb, high_protein, vegetarian, keto,
             diet_price_add_min, diet_price_add_max,
             calories, protein, carbs, fats, active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name)
    .bind(payload.template_type)
    .bind(payload.base_price)
    .bind(payload.price_min)
    .bind(payload.price_max)
    .bind(components)
    .bind(payload.low_carb)
    .bind(payload.high_protein)
    .bind(payload.vegetarian)
    .bind(payload.keto)
    .bind(payload.diet_price_add_min)
    .bind(payload.diet_price_add_max)
    .bind(aggregate.calories)
    .bind(aggregate.protein)
    .bind(aggregate.carbs)
    .bind(aggregate.fats)
    .bind(payload.active)
    .fetch_one(&state.pool)
    .await?;

    audit(state, user, "menu_create", "menu_templates", menu.id).await;
    Ok(ApiResponse::success(
        "Menu created",
        menu,
        Some(Meta::empty()),
    ))
}

pub async fn update_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuRequest,
) -> AppResult<ApiResponse<MenuTemplate>> {
    ensure_admin(user)?;

    let existing: Option<MenuTemplate> =
        sqlx::query_as("SELECT * FROM menu_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    let template_type = payload.template_type.unwrap_or(existing.template_type);
    validate_template_type(&template_type)?;

    let components: ComponentMap = match payload.components {
        Some(map) => map,
        None => serde_json::from_value(existing.components.clone())
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?,
    };

    // Aggregate nutrition is recomputed on every save, so edits to the
    // referenced ingredients are picked up here and only here.
    let aggregate = aggregate_nutrition(state, &template_type, &components).await?;
    let components_json = serde_json::to_value(&components)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let menu: MenuTemplate = sqlx::query_as(
        r#"
        UPDATE menu_templates
        SET name = $2, template_type = $3, base_price = $4, price_min = $5,
            price_max = $6, components = $7, low_carb = $8, high_protein = $9,
            vegetarian = $10, keto = $11, diet_price_add_min = $12,
            diet_price_add_max = $13, calories = $14, protein = $15,
            carbs = $16, fats = $17, active = $18, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name.unwrap_or(existing.name))
    .bind(template_type)
    .bind(payload.base_price.unwrap_or(existing.base_price))
    .bind(payload.price_min.unwrap_or(existing.price_min))
    .bind(payload.price_max.unwrap_or(existing.price_max))
    .bind(components_json)
    .bind(payload.low_carb.unwrap_or(existing.low_carb))
    .bind(payload.high_protein.unwrap_or(existing.high_protein))
    .bind(payload.vegetarian.unwrap_or(existing.vegetarian))
    .bind(payload.keto.unwrap_or(existing.keto))
    .bind(payload.diet_price_add_min.unwrap_or(existing.diet_price_add_min))
    .bind(payload.diet_price_add_max.unwrap_or(existing.diet_price_add_max))
    .bind(aggregate.calories)
    .bind(aggregate.protein)
    .bind(aggregate.carbs)
    .bind(aggregate.fats)
    .bind(payload.active.unwrap_or(existing.active))
    .fetch_one(&state.pool)
    .await?;

    audit(state, user, "menu_update", "menu_templates", id).await;
    Ok(ApiResponse::success(
        "Menu updated",
        menu,
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = sqlx::query("DELETE FROM menu_templates WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    audit(state, user, "menu_delete", "menu_templates", id).await;
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// --- fitness videos ------------------------------------------------------

pub async fn create_video(
    state: &AppState,
    user: &AuthUser,
    payload: CreateVideoRequest,
) -> AppResult<ApiResponse<FitnessVideo>> {
    ensure_admin(user)?;
    if payload.title.trim().is_empty() || payload.video_url.trim().is_empty() {
        return Err(AppError::BadRequest("title and video_url are required".into()));
    }

    let video: FitnessVideo = sqlx::query_as(
        r#"
        INSERT INTO fitness_videos
            (id, title, description, video_url, category, difficulty,
             duration_minutes, calories_burned, instructor, rating)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.title)
    .bind(payload.description)
    .bind(payload.video_url)
    .bind(payload.category)
    .bind(payload.difficulty)
    .bind(payload.duration_minutes)
    .bind(payload.calories_burned)
    .bind(payload.instructor)
    .bind(payload.rating)
    .fetch_one(&state.pool)
    .await?;

    audit(state, user, "video_create", "fitness_videos", video.id).await;
    Ok(ApiResponse::success(
        "Video created",
        video,
        Some(Meta::empty()),
    ))
}

pub async fn update_video(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateVideoRequest,
) -> AppResult<ApiResponse<FitnessVideo>> {
    ensure_admin(user)?;

    let existing: Option<FitnessVideo> =
        sqlx::query_as("SELECT * FROM fitness_videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?;
    let existing = match existing {
        Some(v) => v,
        None => return Err(AppError::NotFound),
    };

    let video: FitnessVideo = sqlx::query_as(
        r#"
        UPDATE fitness_videos
        SET title = $2, description = $3, video_url = $4, category = $5,
            difficulty = $6, duration_minutes = $7, calories_burned = $8,
            instructor = $9, rating = $10, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.title.unwrap_or(existing.title))
    .bind(payload.description.or(existing.description))
    .bind(payload.video_url.unwrap_or(existing.video_url))
    .bind(payload.category.unwrap_or(existing.category))
    .bind(payload.difficulty.unwrap_or(existing.difficulty))
    .bind(payload.duration_minutes.unwrap_or(existing.duration_minutes))
    .bind(payload.calories_burned.unwrap_or(existing.calories_burned))
    .bind(payload.instructor.unwrap_or(existing.instructor))
    .bind(payload.rating.unwrap_or(existing.rating))
    .fetch_one(&state.pool)
    .await?;

    audit(state, user, "video_update", "fitness_videos", id).await;
    Ok(ApiResponse::success(
        "Video updated",
        video,
        Some(Meta::empty()),
    ))
}

pub async fn delete_video(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = sqlx::query("DELETE FROM fitness_videos WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    audit(state, user, "video_delete", "fitness_videos", id).await;
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// --- orders --------------------------------------------------------------

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: String,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    if !ORDER_STATUSES.contains(&status.as_str()) {
        return Err(AppError::BadRequest("Invalid order status".into()));
    }

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit(state, user, "order_status_update", "orders", order.id).await;
    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

// --- helpers -------------------------------------------------------------

/// Ingredient ids that count towards a template's aggregate nutrition.
/// The vegetable slot of a mixed package is deliberately left out; other
/// template types include it.
fn selected_ingredient_ids(template_type: &str, components: &ComponentMap) -> Vec<Uuid> {
    components
        .iter()
        .filter(|(category, _)| {
            !(template_type == "mixed_package" && category.as_str() == "vegetable")
        })
        .flat_map(|(_, spec)| spec.options.iter().copied())
        .collect()
}

async fn aggregate_nutrition(
    state: &AppState,
    template_type: &str,
    components: &ComponentMap,
) -> AppResult<Nutrition> {
    let ids = selected_ingredient_ids(template_type, components);
    if ids.is_empty() {
        return Ok(Nutrition::default());
    }

    let rows: Vec<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_all(&state.pool)
        .await?;

    if rows.len() < ids.len() {
        // Stale references survive ingredient deletion; they simply stop
        // contributing to the sum.
        tracing::warn!(
            missing = ids.len() - rows.len(),
            "menu components reference ingredients that no longer exist"
        );
    }

    // Options may repeat an ingredient across categories; every reference
    // counts once per occurrence.
    let by_id: std::collections::HashMap<Uuid, Nutrition> =
        rows.iter().map(|i| (i.id, i.nutrition())).collect();
    let total = nutrition::sum(ids.iter().filter_map(|id| by_id.get(id).copied()));

    Ok(total.rounded())
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if INGREDIENT_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid ingredient category".into()))
    }
}

fn validate_template_type(template_type: &str) -> Result<(), AppError> {
    if TEMPLATE_TYPES.contains(&template_type) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid template type".into()))
    }
}

async fn audit(state: &AppState, user: &AuthUser, action: &str, resource: &str, id: Uuid) {
    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        action,
        Some(resource),
        Some(serde_json::json!({ "id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::menus::ComponentSpec;

    fn components(entries: &[(&str, Vec<Uuid>)]) -> ComponentMap {
        entries
            .iter()
            .map(|(key, options)| {
                (
                    key.to_string(),
                    ComponentSpec {
                        required: true,
                        multi_select: false,
                        options: options.clone(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn mixed_package_skips_the_vegetable_slot() {
        let rice = Uuid::new_v4();
        let veg = Uuid::new_v4();
        let map = components(&[("rice_carb", vec![rice]), ("vegetable", vec![veg])]);

        let mixed = selected_ingredient_ids("mixed_package", &map);
        assert_eq!(mixed, vec![rice]);

        let snack = selected_ingredient_ids("snack_box", &map);
        assert!(snack.contains(&rice) && snack.contains(&veg));
    }

    #[test]
    fn repeated_references_count_per_occurrence() {
        let shared = Uuid::new_v4();
        let map = components(&[("fruit", vec![shared]), ("snack", vec![shared])]);
        let ids = selected_ingredient_ids("snack_box", &map);
        assert_eq!(ids.len(), 2);
    }
}
