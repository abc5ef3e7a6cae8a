use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order((categories::name.asc(), categories::id.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn upsert_categories(&self, categories: &[NewCategory]) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            let mut affected = 0;
            for category in categories {
                let row = DbNewCategory::from(category);
                affected += diesel::insert_into(categories::table)
                    .values(&row)
                    .on_conflict(categories::href)
                    .do_update()
                    .set(categories::name.eq(excluded(categories::name)))
                    .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(affected)
        })?;

        Ok(affected)
    }

    fn mark_category_scraped(
        &self,
        id: CategoryId,
        at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.filter(categories::id.eq(id.get())))
            .set(categories::last_scraped.eq(Some(at)))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
