use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, ProductId, ProductRank, ProductSummary, ProductTitle, ProductUrl,
};

/// A product stored as part of a category's latest scrape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub title: ProductTitle,
    pub affiliate_link: ProductUrl,
    pub summary: Option<ProductSummary>,
    pub rank: ProductRank,
    pub last_updated: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// One ranked listing entry, either freshly extracted from a page or
/// submitted for a manual replacement.
///
/// A batch of `NewProduct` values handed to the store carries ranks
/// `1..=len` in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub title: ProductTitle,
    pub affiliate_link: ProductUrl,
    pub summary: Option<ProductSummary>,
    pub rank: ProductRank,
}
