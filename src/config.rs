use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Flat delivery fee added on top of the cart subtotal, in minor units.
    pub shipping_fee: i64,
    pub payment_base_url: String,
    pub payment_server_key: String,
    pub chat_api_url: String,
    pub chat_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let shipping_fee = env::var("SHIPPING_FEE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        let payment_base_url = env::var("PAYMENT_BASE_URL")
            .unwrap_or_else(|_| "https://app.sandbox.midtrans.com".to_string());
        let payment_server_key = env::var("PAYMENT_SERVER_KEY").unwrap_or_default();
        let chat_api_url = env::var("CHAT_API_URL").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
                .to_string()
        });
        let chat_api_key = env::var("CHAT_API_KEY").unwrap_or_default();
        Ok(Self {
            database_url,
            host,
            port,
            shipping_fee,
            payment_base_url,
            payment_server_key,
            chat_api_url,
            chat_api_key,
        })
    }
}
