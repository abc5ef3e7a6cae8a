use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::domain::types::{CategoryHref, CategoryName, TypeConstraintError};

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryEntryForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub href: String,
}

/// Body of the category setup request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SetupCategoriesForm {
    #[serde(default)]
    #[validate(nested)]
    pub categories: Vec<CategoryEntryForm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetupCategoriesPayload {
    pub categories: Vec<NewCategory>,
}

#[derive(Debug, Error)]
pub enum SetupCategoriesFormError {
    #[error("No categories provided. Send array of {{name, href}} objects")]
    Empty,
    #[error("Setup categories form validation failed: {0}")]
    Validation(String),
    #[error("Setup categories form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SetupCategoriesFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SetupCategoriesFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SetupCategoriesForm> for SetupCategoriesPayload {
    type Error = SetupCategoriesFormError;

    fn try_from(value: SetupCategoriesForm) -> Result<Self, Self::Error> {
        if value.categories.is_empty() {
            return Err(SetupCategoriesFormError::Empty);
        }
        value.validate()?;

        let categories = value
            .categories
            .into_iter()
            .map(|entry| {
                Ok(NewCategory {
                    name: CategoryName::new(entry.name)?,
                    href: CategoryHref::new(entry.href)?,
                })
            })
            .collect::<Result<Vec<_>, TypeConstraintError>>()?;

        Ok(Self { categories })
    }
}
