use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::NewProduct;
use crate::domain::types::{
    ProductRank, ProductSummary, ProductTitle, ProductUrl, TypeConstraintError,
};

#[derive(Debug, Deserialize, Validate)]
pub struct ProductEntryForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(url)]
    pub affiliate_link: String,
    pub summary: Option<String>,
}

/// Body of a manual product replacement. Entries are ranked in the order
/// given.
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceProductsForm {
    #[validate(nested)]
    pub products: Vec<ProductEntryForm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceProductsPayload {
    pub products: Vec<NewProduct>,
}

#[derive(Debug, Error)]
pub enum ReplaceProductsFormError {
    #[error("No products provided")]
    Empty,
    #[error("Replace products form validation failed: {0}")]
    Validation(String),
    #[error("Replace products form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ReplaceProductsFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ReplaceProductsFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ReplaceProductsForm> for ReplaceProductsPayload {
    type Error = ReplaceProductsFormError;

    fn try_from(value: ReplaceProductsForm) -> Result<Self, Self::Error> {
        if value.products.is_empty() {
            return Err(ReplaceProductsFormError::Empty);
        }
        value.validate()?;

        let products = value
            .products
            .into_iter()
            .zip(1..)
            .map(|(entry, rank)| {
                Ok(NewProduct {
                    title: ProductTitle::new(entry.title)?,
                    affiliate_link: ProductUrl::new(entry.affiliate_link)?,
                    summary: entry
                        .summary
                        .filter(|s| !s.trim().is_empty())
                        .map(ProductSummary::new)
                        .transpose()?,
                    rank: ProductRank::new(rank)?,
                })
            })
            .collect::<Result<Vec<_>, TypeConstraintError>>()?;

        Ok(Self { products })
    }
}
