use axum::{Json, Router, extract::State, routing::post};
use serde_json::json;

use crate::{
    dto::glue::{ChatReply, ChatRequest, CreatePaymentRequest, PaymentCreated},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

pub fn payment_router() -> Router<AppState> {
    Router::new().route("/create", post(create_payment))
}

pub fn chat_router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// Standalone invoice creation, decoupled from the order flow. The storefront
/// uses it for one-off charges; regular checkout goes through
/// `/api/orders/{id}/pay`.
#[utoipa::path(
    post,
    path = "/api/payments/create",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Snap token and order reference", body = ApiResponse<PaymentCreated>),
        (status = 400, description = "Missing or non-positive total, missing order_id"),
        (status = 502, description = "Payment provider failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<ApiResponse<PaymentCreated>>> {
    let total = match payload.total {
        Some(t) if t > 0 => t,
        _ => return Err(AppError::BadRequest("total must be a positive amount".into())),
    };
    let order_id = payload
        .order_id
        .ok_or_else(|| AppError::BadRequest("order_id is required".into()))?;
    let email = match payload.customer_email {
        Some(email) => email,
        None => sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = $1")
            .bind(user.user_id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or(AppError::NotFound)?,
    };

    let snap = state
        .payments
        .create_transaction(order_id, total, &email, &[])
        .await?;

    Ok(Json(ApiResponse::success(
        "Payment created",
        PaymentCreated {
            payment: json!({
                "token": snap.token,
                "redirect_url": snap.redirect_url,
                "order_id": snap.order_ref,
            }),
        },
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ApiResponse<ChatReply>),
        (status = 400, description = "Empty message"),
        (status = 502, description = "Chat provider failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ApiResponse<ChatReply>>> {
    let message = match payload.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => return Err(AppError::BadRequest("message is required".into())),
    };

    let text = state.chat.reply(&message).await?;
    Ok(Json(ApiResponse::success(
        "Reply",
        ChatReply { text },
        None,
    )))
}
