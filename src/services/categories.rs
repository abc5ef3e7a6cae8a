use chrono::{TimeDelta, Utc};

use crate::domain::refresh::due_categories;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryDto;
use crate::dto::products::ProductDto;
use crate::forms::categories::SetupCategoriesPayload;
use crate::forms::products::ReplaceProductsPayload;
use crate::repository::{CategoryReader, CategoryWriter, ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult};

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Categories eligible for a refresh, never-scraped first, then oldest.
pub fn list_due_categories<R>(repo: &R, window: TimeDelta) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;

    Ok(due_categories(categories, window, Utc::now().naive_utc())
        .into_iter()
        .map(CategoryDto::from)
        .collect())
}

pub fn show_category_products<R>(
    category_id: i32,
    repo: &R,
) -> ServiceResult<(CategoryDto, Vec<ProductDto>)>
where
    R: CategoryReader + ProductReader,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    let category = match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.list_products_by_category(category.id) {
        Ok(products) => Ok((
            CategoryDto::from(category),
            products.into_iter().map(ProductDto::from).collect(),
        )),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Seed or rename categories. Returns the number of entries processed.
pub fn setup_categories<R>(payload: SetupCategoriesPayload, repo: &R) -> ServiceResult<usize>
where
    R: CategoryWriter,
{
    match repo.upsert_categories(&payload.categories) {
        Ok(count) => {
            log::info!("Set up {count} categories");
            Ok(count)
        }
        Err(e) => {
            log::error!("Failed to set up categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Replace a category's products with a manually supplied ranking.
///
/// The scrape stamp is left alone so the category keeps its place in the
/// refresh queue.
pub fn replace_category_products<R>(
    category_id: i32,
    payload: ReplaceProductsPayload,
    repo: &R,
) -> ServiceResult<usize>
where
    R: CategoryReader + ProductWriter,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.replace_products(category_id, &payload.products) {
        Ok(count) => Ok(count),
        Err(e) => {
            log::error!("Failed to replace products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDateTime};

    use super::*;
    use crate::domain::category::{Category, NewCategory};
    use crate::domain::product::NewProduct;
    use crate::domain::types::{
        CategoryHref, CategoryName, ProductRank, ProductTitle, ProductUrl,
    };
    use crate::repository::test::TestRepository;

    fn timestamp(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn category(id: i32, name: &str, last_scraped: Option<NaiveDateTime>) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            href: CategoryHref::new(format!("/zgbs/{id}")).unwrap(),
            last_scraped,
            created_at: timestamp(0),
        }
    }

    fn new_product(title: &str, rank: i32) -> NewProduct {
        NewProduct {
            title: ProductTitle::new(title).unwrap(),
            affiliate_link: ProductUrl::new(format!(
                "https://www.amazon.com/dp/B0000000{rank:02}?tag=t-20"
            ))
            .unwrap(),
            summary: None,
            rank: ProductRank::new(rank).unwrap(),
        }
    }

    #[test]
    fn lists_categories_by_name() {
        let repo = TestRepository::new(
            vec![category(1, "Toys", None), category(2, "Books", None)],
            vec![],
        );

        let names: Vec<String> = list_categories(&repo)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Books", "Toys"]);
    }

    #[test]
    fn due_listing_skips_fresh_categories() {
        let now = Utc::now().naive_utc();
        let repo = TestRepository::new(
            vec![
                category(1, "Fresh", Some(now - TimeDelta::hours(1))),
                category(2, "Stale", Some(now - TimeDelta::hours(48))),
                category(3, "New", None),
            ],
            vec![],
        );

        let ids: Vec<i32> = list_due_categories(&repo, TimeDelta::hours(24))
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn products_of_unknown_category_are_not_found() {
        let repo = TestRepository::default();

        assert_eq!(
            show_category_products(7, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn shows_products_in_rank_order() {
        let repo = TestRepository::new(vec![category(1, "Books", None)], vec![]);
        replace_category_products(
            1,
            ReplaceProductsPayload {
                products: vec![new_product("Second", 2), new_product("First", 1)],
            },
            &repo,
        )
        .unwrap();

        let (category, products) = show_category_products(1, &repo).unwrap();

        assert_eq!(category.name, "Books");
        let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn setup_renames_existing_href() {
        let repo = TestRepository::new(vec![category(1, "Old name", None)], vec![]);
        let payload = SetupCategoriesPayload {
            categories: vec![NewCategory {
                name: CategoryName::new("New name").unwrap(),
                href: CategoryHref::new("/zgbs/1").unwrap(),
            }],
        };

        assert_eq!(setup_categories(payload, &repo), Ok(1));
        let stored = repo.category(CategoryId::new(1).unwrap()).unwrap();
        assert_eq!(stored.name.as_str(), "New name");
    }

    #[test]
    fn setup_failure_is_internal() {
        let repo = TestRepository::default().failing_writes();
        let payload = SetupCategoriesPayload {
            categories: vec![NewCategory {
                name: CategoryName::new("Books").unwrap(),
                href: CategoryHref::new("/zgbs/books").unwrap(),
            }],
        };

        assert_eq!(setup_categories(payload, &repo), Err(ServiceError::Internal));
    }

    #[test]
    fn manual_replacement_keeps_scrape_stamp() {
        let stamp = timestamp(1_000);
        let repo = TestRepository::new(vec![category(1, "Books", Some(stamp))], vec![]);

        let count = replace_category_products(
            1,
            ReplaceProductsPayload {
                products: vec![new_product("Only", 1)],
            },
            &repo,
        )
        .unwrap();

        assert_eq!(count, 1);
        let stored = repo.category(CategoryId::new(1).unwrap()).unwrap();
        assert_eq!(stored.last_scraped, Some(stamp));
    }
}
