use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{
    CategoryId, ProductSummary, ProductTitle, ProductUrl, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub affiliate_link: String,
    pub summary: Option<String>,
    pub rank: i32,
    pub last_updated: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Product`] scoped to one category.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub category_id: i32,
    pub title: &'a str,
    pub affiliate_link: &'a str,
    pub summary: Option<&'a str>,
    pub rank: i32,
}

impl<'a> NewProduct<'a> {
    pub fn for_category(category_id: CategoryId, product: &'a DomainNewProduct) -> Self {
        Self {
            category_id: category_id.get(),
            title: product.title.as_str(),
            affiliate_link: product.affiliate_link.as_str(),
            summary: product.summary.as_ref().map(|s| s.as_str()),
            rank: product.rank.get(),
        }
    }
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            category_id: product.category_id.try_into()?,
            title: ProductTitle::new(product.title)?,
            affiliate_link: ProductUrl::new(product.affiliate_link)?,
            // Blank summaries read back as absent rather than failing the row.
            summary: product.summary.and_then(|s| ProductSummary::new(s).ok()),
            rank: product.rank.try_into()?,
            last_updated: product.last_updated,
            created_at: product.created_at,
        })
    }
}
