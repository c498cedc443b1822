pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod ledger_service;
pub mod order_service;
pub mod plan_service;
