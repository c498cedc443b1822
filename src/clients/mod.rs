pub mod chat;
pub mod payment;
