use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MenuTemplate;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub menu_id: Uuid,
    pub quantity: i32,
    /// Optional single add-on ingredient for menu types that allow one.
    pub addon_ingredient_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItemDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub id: Uuid,
    pub menu: MenuTemplate,
    pub quantity: i32,
    pub addon_ingredient_id: Option<Uuid>,
}
