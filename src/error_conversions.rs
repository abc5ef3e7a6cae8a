//! Error conversion glue.
//!
//! The domain layer must not depend on service/repository error types, so
//! the conversions live here. Only the repository conversion is available
//! to `data` feature consumers.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod service {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::categories::SetupCategoriesFormError;
    use crate::forms::products::ReplaceProductsFormError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<SetupCategoriesFormError> for ServiceError {
        fn from(val: SetupCategoriesFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<ReplaceProductsFormError> for ServiceError {
        fn from(val: ReplaceProductsFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }
}
