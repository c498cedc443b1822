use crate::{
    clients::{chat::ChatClient, payment::PaymentClient},
    config::AppConfig,
    db::{DbPool, OrmConn},
};

/// Everything a handler needs, built once in `main` and cloned into the
/// router. No module reaches for process-wide globals.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub payments: PaymentClient,
    pub chat: ChatClient,
    pub shipping_fee: i64,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn, config: &AppConfig) -> Self {
        Self {
            pool,
            orm,
            payments: PaymentClient::new(&config.payment_base_url, &config.payment_server_key),
            chat: ChatClient::new(&config.chat_api_url, &config.chat_api_key),
            shipping_fee: config.shipping_fee,
        }
    }
}
