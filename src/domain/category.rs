use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryHref, CategoryId, CategoryName};

/// Curated catalog category owning a ranked product listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub href: CategoryHref,
    /// `None` until the first successful scrape.
    pub last_scraped: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a [`Category`], or rename the one sharing `href`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub href: CategoryHref,
}
