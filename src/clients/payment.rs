use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Client for the third-party invoicing provider. The provider answers a
/// transaction request with a snap token the storefront feeds into its
/// embedded payment widget.
#[derive(Clone)]
pub struct PaymentClient {
    http: Client,
    base_url: String,
    server_key: String,
}

#[derive(Debug)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: Option<String>,
    pub order_ref: String,
}

impl PaymentClient {
    pub fn new(base_url: &str, server_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            server_key: server_key.to_string(),
        }
    }

    pub async fn create_transaction(
        &self,
        order_id: Uuid,
        gross_amount: i64,
        customer_email: &str,
        item_details: &[Value],
    ) -> AppResult<SnapTransaction> {
        let order_ref = format!("order-{order_id}");
        let response = self
            .http
            .post(format!("{}/snap/v1/transactions", self.base_url))
            .basic_auth(&self.server_key, Some(""))
            .json(&json!({
                "transaction_details": {
                    "order_id": order_ref,
                    "gross_amount": gross_amount,
                },
                "item_details": item_details,
                "customer_details": {
                    "email": customer_email,
                },
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("payment request failed: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("payment response unreadable: {e}")))?;

        if !status.is_success() {
            tracing::error!(%status, %body, "payment provider rejected transaction");
            return Err(AppError::Upstream(format!(
                "payment provider returned {status}"
            )));
        }

        // A reply without a token is useless to the widget, treat it as failure.
        let token = body["token"]
            .as_str()
            .ok_or_else(|| AppError::Upstream("payment provider returned no token".into()))?
            .to_string();

        Ok(SnapTransaction {
            token,
            redirect_url: body["redirect_url"].as_str().map(|s| s.to_string()),
            order_ref,
        })
    }
}
