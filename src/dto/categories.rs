use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub href: String,
    pub last_scraped: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            href: value.href.into_inner(),
            last_scraped: value.last_scraped,
            created_at: value.created_at,
        }
    }
}
