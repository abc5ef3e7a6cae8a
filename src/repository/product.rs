use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{NewProduct, Product};
use crate::domain::types::CategoryId;
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let items = products::table
            .filter(products::category_id.eq(category_id.get()))
            .order(products::rank.asc())
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }
}

/// Delete the category's rows and insert `rows` in their place.
fn swap_rows(
    conn: &mut SqliteConnection,
    category_id: CategoryId,
    rows: &[DbNewProduct<'_>],
) -> QueryResult<usize> {
    use crate::schema::products;

    diesel::delete(products::table.filter(products::category_id.eq(category_id.get())))
        .execute(conn)?;

    if rows.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(products::table)
        .values(rows)
        .execute(conn)
}

impl ProductWriter for DieselRepository {
    fn replace_products(
        &self,
        category_id: CategoryId,
        products: &[NewProduct],
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let rows = products
            .iter()
            .map(|product| DbNewProduct::for_category(category_id, product))
            .collect::<Vec<_>>();

        // Readers never observe the category between the delete and the insert.
        let inserted = conn.transaction(|conn| swap_rows(conn, category_id, &rows))?;

        Ok(inserted)
    }

    fn store_scrape(
        &self,
        category_id: CategoryId,
        products: &[NewProduct],
        at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let rows = products
            .iter()
            .map(|product| DbNewProduct::for_category(category_id, product))
            .collect::<Vec<_>>();

        let inserted = conn.transaction(|conn| {
            let inserted = swap_rows(conn, category_id, &rows)?;
            let stamped =
                diesel::update(categories::table.filter(categories::id.eq(category_id.get())))
                    .set(categories::last_scraped.eq(Some(at)))
                    .execute(conn)?;
            if stamped == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(inserted)
        })?;

        Ok(inserted)
    }
}
