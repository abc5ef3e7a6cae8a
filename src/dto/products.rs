use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::product::Product;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub affiliate_link: String,
    pub summary: Option<String>,
    pub rank: i32,
    pub last_updated: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            category_id: value.category_id.get(),
            title: value.title.into_inner(),
            affiliate_link: value.affiliate_link.into_inner(),
            summary: value.summary.map(|s| s.into_inner()),
            rank: value.rank.get(),
            last_updated: value.last_updated,
            created_at: value.created_at,
        }
    }
}
