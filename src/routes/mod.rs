use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod doc;
pub mod glue;
pub mod health;
pub mod logs;
pub mod orders;
pub mod params;
pub mod plans;
pub mod profile;
pub mod videos;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/menus", catalog::menu_router())
        .nest("/ingredients", catalog::ingredient_router())
        .nest("/videos", videos::router())
        .nest("/profile", profile::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/plans", plans::router())
        .nest("/logs", logs::router())
        .nest("/admin", admin::router())
        .nest("/payments", glue::payment_router())
        .merge(glue::chat_router())
}
