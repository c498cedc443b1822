use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MenuTemplate;

/// One component slot of a menu template: which ingredients a customer may
/// pick for a category, and how.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentSpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multi_select: bool,
    #[serde(default)]
    pub options: Vec<Uuid>,
}

/// Category key -> component spec. BTreeMap keeps the stored JSON stable.
pub type ComponentMap = BTreeMap<String, ComponentSpec>;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuRequest {
    pub name: String,
    pub template_type: String,
    #[serde(default)]
    pub base_price: i64,
    #[serde(default)]
    pub price_min: i64,
    #[serde(default)]
    pub price_max: i64,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub components: ComponentMap,
    #[serde(default)]
    pub low_carb: bool,
    #[serde(default)]
    pub high_protein: bool,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub keto: bool,
    #[serde(default)]
    pub diet_price_add_min: i64,
    #[serde(default)]
    pub diet_price_add_max: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuRequest {
    pub name: Option<String>,
    pub template_type: Option<String>,
    pub base_price: Option<i64>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    #[schema(value_type = Object)]
    pub components: Option<ComponentMap>,
    pub low_carb: Option<bool>,
    pub high_protein: Option<bool>,
    pub vegetarian: Option<bool>,
    pub keto: Option<bool>,
    pub diet_price_add_min: Option<i64>,
    pub diet_price_add_max: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuList {
    pub items: Vec<MenuTemplate>,
}
