use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub template_type: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngredientQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VideoQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    /// Substring match over title and instructor.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}
