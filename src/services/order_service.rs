use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{nutrition, pricing},
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems, PaymentRequested},
    entity::{
        cart_items::{self, Column as CartCol, Entity as CartItems},
        menu_templates::Column as MenuCol,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Ingredient, Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

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
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.recipient_name.trim().is_empty()
        || payload.phone.trim().is_empty()
        || payload.address.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "recipient_name, phone and address are required".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    #[derive(Debug, FromQueryResult)]
    struct CartMenuRow {
        menu_id: Uuid,
        quantity: i32,
        addon_ingredient_id: Option<Uuid>,
        menu_name: String,
        template_type: String,
        base_price: i64,
        calories: f64,
        protein: f64,
        carbs: f64,
        fats: f64,
    }

    let rows = CartItems::find()
        .select_only()
        .column_as(CartCol::MenuId, "menu_id")
        .column_as(CartCol::Quantity, "quantity")
        .column_as(CartCol::AddonIngredientId, "addon_ingredient_id")
        .join(JoinType::InnerJoin, cart_items::Relation::MenuTemplates.def())
        .column_as(MenuCol::Name, "menu_name")
        .column_as(MenuCol::TemplateType, "template_type")
        .column_as(MenuCol::BasePrice, "base_price")
        .column_as(MenuCol::Calories, "calories")
        .column_as(MenuCol::Protein, "protein")
        .column_as(MenuCol::Carbs, "carbs")
        .column_as(MenuCol::Fats, "fats")
        .filter(CartCol::UserId.eq(user.user_id))
        .lock(LockType::Update)
        .into_model::<CartMenuRow>()
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let mut lines = Vec::with_capacity(rows.len());
    for row in &rows {
        if row.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        lines.push(pricing::PriceLine {
            unit_price: row.base_price,
            quantity: row.quantity as i64,
        });
    }

    let subtotal = pricing::subtotal(&lines);
    let total = pricing::total(&lines, state.shipping_fee);

    // Resolve add-on nutrition up front so each order item can snapshot the
    // combined value.
    let addon_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.addon_ingredient_id).collect();
    let addons: HashMap<Uuid, Ingredient> = if addon_ids.is_empty() {
        HashMap::new()
    } else {
        sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = ANY($1)")
            .bind(&addon_ids)
            .fetch_all(&state.pool)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect()
    };

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        status: Set("pending".into()),
        subtotal: Set(subtotal),
        shipping_fee: Set(state.shipping_fee),
        total: Set(total),
        recipient_name: Set(payload.recipient_name),
        phone: Set(payload.phone),
        address: Set(payload.address),
        payment_token: Set(None),
        payment_order_ref: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();

    for row in &rows {
        let base = nutrition::Nutrition::new(row.calories, row.protein, row.carbs, row.fats);
        // Only the mixed package carries a single add-on.
        let addon = row
            .addon_ingredient_id
            .filter(|_| row.template_type == "mixed_package")
            .and_then(|id| addons.get(&id))
            .map(|i| i.nutrition());
        let combined = nutrition::combine(base, addon).rounded();

        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_id: Set(row.menu_id),
            menu_name: Set(row.menu_name.clone()),
            quantity: Set(row.quantity),
            unit_price: Set(row.base_price),
            addon_ingredient_id: Set(row.addon_ingredient_id),
            calories: Set(combined.calories),
            protein: Set(combined.protein),
            carbs: Set(combined.carbs),
            fats: Set(combined.fats),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        order_items.push(order_item_from_entity(item));
    }

    // clear cart
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total": total })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems {
            order: order_from_entity(order),
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

/// Ask the payment provider for a snap token and move the order to
/// pending_payment.
pub async fn request_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentRequested>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if order.status != "pending" && order.status != "pending_payment" {
        return Err(AppError::BadRequest(format!(
            "order is {} and cannot be paid",
            order.status
        )));
    }

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;

    let email: (String,) = sqlx::query_as("SELECT email FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_one(&state.pool)
        .await?;

    let item_details: Vec<serde_json::Value> = items
        .iter()
        .map(|i| {
            serde_json::json!({
                "id": i.menu_id,
                "name": i.menu_name,
                "price": i.unit_price,
                "quantity": i.quantity,
            })
        })
        .collect();

    let snap = state
        .payments
        .create_transaction(order.id, order.total, &email.0, &item_details)
        .await?;

    let mut active: OrderActive = order.into();
    active.status = Set("pending_payment".into());
    active.payment_token = Set(Some(snap.token.clone()));
    active.payment_order_ref = Set(Some(snap.order_ref));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_requested",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment token created",
        PaymentRequested {
            order: order_from_entity(order),
            snap_token: snap.token,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        status: model.status,
        subtotal: model.subtotal,
        shipping_fee: model.shipping_fee,
        total: model.total,
        recipient_name: model.recipient_name,
        phone: model.phone,
        address: model.address,
        payment_token: model.payment_token,
        payment_order_ref: model.payment_order_ref,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        menu_id: model.menu_id,
        menu_name: model.menu_name,
        quantity: model.quantity,
        unit_price: model.unit_price,
        addon_ingredient_id: model.addon_ingredient_id,
        calories: model.calories,
        protein: model.protein,
        carbs: model.carbs,
        fats: model.fats,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
