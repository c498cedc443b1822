pub mod auth;
pub mod cart;
pub mod glue;
pub mod ingredients;
pub mod logs;
pub mod menus;
pub mod orders;
pub mod plans;
pub mod profile;
pub mod videos;
