use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub total: Option<i64>,
    pub order_id: Option<Uuid>,
    pub customer_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentCreated {
    #[schema(value_type = Object)]
    pub payment: serde_json::Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatReply {
    pub text: String,
}
