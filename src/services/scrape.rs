//! Scrape orchestration: fetch a listing, replace the stored ranking and
//! stamp the category.

use chrono::{NaiveDateTime, Utc};

use crate::crawl::{PageSource, Scraper};
use crate::domain::category::Category;
use crate::domain::refresh::due_categories;
use crate::domain::types::CategoryId;
use crate::dto::scrape::BatchScrapeResult;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryReader, ProductWriter};

use super::{ServiceError, ServiceResult};

/// Scrape one category and persist the result.
///
/// Returns `Ok(false)` when the page could not be fetched or yielded no
/// products; stored products and the scrape stamp are left untouched then.
/// Storage failures are returned as errors and also leave both untouched.
/// Calls sharing `scraper` never overlap.
pub fn scrape_and_store<S, R>(
    category: &Category,
    scraper: &Scraper<S>,
    repo: &R,
    now: NaiveDateTime,
) -> RepositoryResult<bool>
where
    S: PageSource,
    R: ProductWriter,
{
    let _turn = scraper.exclusive();

    let products = match scraper.scrape_listing(&category.href) {
        Ok(products) => products,
        Err(e) => {
            log::error!("Failed to scrape category {}: {e}", category.name);
            return Ok(false);
        }
    };

    if products.is_empty() {
        log::warn!("No products found for category {}", category.name);
        return Ok(false);
    }

    let stored = repo.store_scrape(category.id, &products, now)?;
    log::info!("Stored {stored} products for category {}", category.name);
    Ok(true)
}

/// Scrape a single category on demand, regardless of staleness.
pub fn scrape_category<S, R>(category_id: i32, scraper: &Scraper<S>, repo: &R) -> ServiceResult<bool>
where
    S: PageSource,
    R: CategoryReader + ProductWriter,
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

    scrape_and_store(&category, scraper, repo, Utc::now().naive_utc()).map_err(|e| {
        log::error!("Failed to store products for category {}: {e}", category.name);
        ServiceError::Internal
    })
}

/// Scrape up to `limit` stale categories, oldest first.
///
/// One category failing does not stop the batch; its outcome is reported
/// alongside the others. The configured batch delay is slept after every
/// category.
pub fn scrape_batch<S, R>(
    limit: Option<usize>,
    scraper: &Scraper<S>,
    repo: &R,
) -> ServiceResult<Vec<BatchScrapeResult>>
where
    S: PageSource,
    R: CategoryReader + ProductWriter,
{
    let settings = *scraper.settings();
    let limit = limit.unwrap_or(settings.batch_limit);

    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;

    let now = Utc::now().naive_utc();
    let due = due_categories(categories, settings.staleness_window, now);
    log::info!("{} categories due for refresh, processing up to {limit}", due.len());

    let mut results = Vec::new();
    for category in due.into_iter().take(limit) {
        let outcome = scrape_and_store(&category, scraper, repo, Utc::now().naive_utc());
        let result = match outcome {
            Ok(success) => BatchScrapeResult {
                category_id: category.id.get(),
                name: category.name.to_string(),
                success,
                error: None,
            },
            Err(e) => {
                log::error!("Failed to store products for category {}: {e}", category.name);
                BatchScrapeResult {
                    category_id: category.id.get(),
                    name: category.name.to_string(),
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
        settings.batch_delay.pause();
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::{DateTime, TimeDelta};
    use url::Url;

    use super::*;
    use crate::crawl::ScrapeSettings;
    use crate::crawl::extractor::Extractor;
    use crate::crawl::fetcher::{FetchError, TransportError};
    use crate::domain::product::Product;
    use crate::domain::types::{
        CategoryHref, CategoryName, ProductId, ProductRank, ProductTitle, ProductUrl,
    };
    use crate::models::config::DelayRange;
    use crate::repository::ProductReader;
    use crate::repository::test::TestRepository;

    const THREE_PRODUCTS: &str = r#"
        <div class="zg-item-immersion">
          <a href="/Echo-Dot/dp/B08N5WRWNW/ref=zg_bs_1"><span>x</span></a>
          <h2>Echo Dot (4th Gen) Smart speaker</h2>
        </div>
        <div class="zg-item-immersion">
          <a href="/Kindle/dp/B07978J597/ref=zg_bs_2"><span>x</span></a>
          <h2>Kindle Paperwhite</h2>
        </div>
        <div class="zg-item-immersion">
          <a href="/Fire-TV/dp/B08C1W5N87/ref=zg_bs_3"><span>x</span></a>
          <h2>Fire TV Stick 4K</h2>
        </div>
    "#;

    /// Page source that serves a fixed page, or fails when given none.
    struct StubSource {
        page: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl StubSource {
        fn serving(page: &'static str) -> Self {
            Self {
                page: Some(page),
                calls: Cell::new(0),
            }
        }

        fn unreachable() -> Self {
            Self {
                page: None,
                calls: Cell::new(0),
            }
        }
    }

    impl PageSource for StubSource {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            match self.page {
                Some(page) => Ok(page.as_bytes().to_vec()),
                None => Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: 3,
                    source: TransportError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE),
                }),
            }
        }
    }

    fn scraper(source: StubSource) -> Scraper<StubSource> {
        Scraper::new(
            source,
            Extractor::new(Url::parse("https://www.amazon.com").unwrap(), "tag-20"),
            ScrapeSettings {
                product_limit: 10,
                batch_limit: 5,
                batch_delay: DelayRange::none(),
                staleness_window: TimeDelta::hours(24),
            },
        )
    }

    fn timestamp(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn category(id: i32, last_scraped: Option<NaiveDateTime>) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(format!("Category {id}")).unwrap(),
            href: CategoryHref::new(format!("/zgbs/category-{id}")).unwrap(),
            last_scraped,
            created_at: timestamp(0),
        }
    }

    fn stored_products(category_id: i32, count: i32) -> Vec<Product> {
        (1..=count)
            .map(|rank| Product {
                id: ProductId::new(rank).unwrap(),
                category_id: CategoryId::new(category_id).unwrap(),
                title: ProductTitle::new(format!("Old product {rank}")).unwrap(),
                affiliate_link: ProductUrl::new(format!(
                    "https://www.amazon.com/dp/B00000000{rank}?tag=tag-20"
                ))
                .unwrap(),
                summary: None,
                rank: ProductRank::new(rank).unwrap(),
                last_updated: timestamp(0),
                created_at: timestamp(0),
            })
            .collect()
    }

    #[test]
    fn replaces_previous_ranking_and_stamps_category() {
        let repo = TestRepository::new(vec![category(1, None)], stored_products(1, 5));
        let scraper = scraper(StubSource::serving(THREE_PRODUCTS));
        let now = timestamp(1_750_000_000);

        let stored = scrape_and_store(&category(1, None), &scraper, &repo, now).unwrap();

        assert!(stored);
        let products = repo
            .list_products_by_category(CategoryId::new(1).unwrap())
            .unwrap();
        let ranks: Vec<i32> = products.iter().map(|p| p.rank.get()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(
            products[0].affiliate_link.as_str(),
            "https://www.amazon.com/dp/B08N5WRWNW?tag=tag-20"
        );
        let category = repo.category(CategoryId::new(1).unwrap()).unwrap();
        assert_eq!(category.last_scraped, Some(now));
    }

    #[test]
    fn empty_page_leaves_stored_data_untouched() {
        let repo = TestRepository::new(vec![category(1, None)], stored_products(1, 2));
        let scraper = scraper(StubSource::serving("<html><body></body></html>"));

        let stored =
            scrape_and_store(&category(1, None), &scraper, &repo, timestamp(100)).unwrap();

        assert!(!stored);
        assert_eq!(repo.products().len(), 2);
        let category = repo.category(CategoryId::new(1).unwrap()).unwrap();
        assert_eq!(category.last_scraped, None);
    }

    #[test]
    fn fetch_failure_reports_false() {
        let repo = TestRepository::new(vec![category(1, None)], vec![]);
        let scraper = scraper(StubSource::unreachable());

        let stored =
            scrape_and_store(&category(1, None), &scraper, &repo, timestamp(100)).unwrap();

        assert!(!stored);
        assert!(repo.products().is_empty());
    }

    #[test]
    fn storage_failure_propagates() {
        let repo = TestRepository::new(vec![category(1, None)], vec![]).failing_writes();
        let scraper = scraper(StubSource::serving(THREE_PRODUCTS));

        assert!(scrape_and_store(&category(1, None), &scraper, &repo, timestamp(100)).is_err());
    }

    #[test]
    fn failed_stamp_keeps_previous_products() {
        let repo =
            TestRepository::new(vec![category(1, None)], stored_products(1, 2)).failing_stamps();
        let scraper = scraper(StubSource::serving(THREE_PRODUCTS));

        assert!(scrape_and_store(&category(1, None), &scraper, &repo, timestamp(100)).is_err());

        let titles: Vec<String> = repo.products().into_iter().map(|p| p.title.into_inner()).collect();
        assert_eq!(titles, vec!["Old product 1", "Old product 2"]);
        let category = repo.category(CategoryId::new(1).unwrap()).unwrap();
        assert_eq!(category.last_scraped, None);
    }

    #[test]
    fn unknown_category_is_not_found() {
        let repo = TestRepository::default();
        let scraper = scraper(StubSource::serving(THREE_PRODUCTS));

        assert_eq!(
            scrape_category(42, &scraper, &repo),
            Err(ServiceError::NotFound)
        );
        assert_eq!(scrape_category(0, &scraper, &repo), Err(ServiceError::NotFound));
        assert_eq!(scraper.source().calls.get(), 0);
    }

    #[test]
    fn single_scrape_ignores_staleness() {
        let fresh = Utc::now().naive_utc();
        let repo = TestRepository::new(vec![category(1, Some(fresh))], vec![]);
        let scraper = scraper(StubSource::serving(THREE_PRODUCTS));

        assert_eq!(scrape_category(1, &scraper, &repo), Ok(true));
        assert_eq!(repo.products().len(), 3);
    }

    #[test]
    fn batch_skips_fresh_categories_and_respects_limit() {
        let now = Utc::now().naive_utc();
        let repo = TestRepository::new(
            vec![
                category(1, Some(now - TimeDelta::hours(1))),
                category(2, Some(now - TimeDelta::hours(48))),
                category(3, None),
                category(4, Some(now - TimeDelta::hours(72))),
            ],
            vec![],
        );
        let scraper = scraper(StubSource::serving(THREE_PRODUCTS));

        let results = scrape_batch(Some(2), &scraper, &repo).unwrap();

        let ids: Vec<i32> = results.iter().map(|r| r.category_id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(results.iter().all(|r| r.success && r.error.is_none()));
        assert_eq!(scraper.source().calls.get(), 2);
    }

    #[test]
    fn batch_records_failures_without_stopping() {
        let repo = TestRepository::new(vec![category(1, None), category(2, None)], vec![])
            .failing_writes();
        let scraper = scraper(StubSource::serving(THREE_PRODUCTS));

        let results = scrape_batch(None, &scraper, &repo).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.success && r.error.is_some()));
    }

    #[test]
    fn batch_reports_unproductive_pages() {
        let repo = TestRepository::new(vec![category(1, None)], vec![]);
        let scraper = scraper(StubSource::unreachable());

        let results = scrape_batch(None, &scraper, &repo).unwrap();

        assert_eq!(
            results,
            vec![BatchScrapeResult {
                category_id: 1,
                name: "Category 1".to_string(),
                success: false,
                error: None,
            }]
        );
    }
}
