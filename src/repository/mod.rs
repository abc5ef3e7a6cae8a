use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::CategoryId;

use self::errors::RepositoryResult;

pub mod category;
pub mod errors;
pub mod product;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Check whether a connection can be checked out of the pool.
    pub fn is_connected(&self) -> bool {
        self.conn().is_ok()
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Insert categories, renaming existing ones that share an `href`.
    fn upsert_categories(&self, categories: &[NewCategory]) -> RepositoryResult<usize>;
    /// Stamp the time of the latest successful scrape.
    fn mark_category_scraped(&self, id: CategoryId, at: NaiveDateTime)
    -> RepositoryResult<usize>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List a category's products ordered by rank.
    fn list_products_by_category(&self, category_id: CategoryId)
    -> RepositoryResult<Vec<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Replace every product of a category in one transaction.
    fn replace_products(
        &self,
        category_id: CategoryId,
        products: &[NewProduct],
    ) -> RepositoryResult<usize>;
    /// Replace a category's products and stamp `last_scraped` in one
    /// transaction. Nothing is written unless both steps succeed.
    fn store_scrape(
        &self,
        category_id: CategoryId,
        products: &[NewProduct],
        at: NaiveDateTime,
    ) -> RepositoryResult<usize>;
}
