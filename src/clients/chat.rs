use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};

const SYSTEM_MESSAGE: &str = "You are a nutrition assistant for a healthy \
catering service. Answer briefly and stick to food, diet and fitness topics.";

/// Thin proxy to a generative-language API.
#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn reply(&self, message: &str) -> AppResult<String> {
        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": [{
                        "text": format!("{SYSTEM_MESSAGE}\n{message}")
                    }]
                }]
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("chat request failed: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("chat response unreadable: {e}")))?;

        if !status.is_success() {
            tracing::error!(%status, %body, "chat provider error");
            return Err(AppError::Upstream(format!("chat provider returned {status}")));
        }

        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Upstream("chat provider reply had no text".into()))
    }
}
