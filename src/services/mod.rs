pub use self::errors::{ServiceError, ServiceResult};

pub mod categories;
pub mod errors;
pub mod scrape;
