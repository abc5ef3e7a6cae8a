//! Fetching and extracting category listings.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::TimeDelta;
use url::Url;

use crate::domain::product::NewProduct;
use crate::domain::refresh::staleness_window;
use crate::domain::types::CategoryHref;
use crate::models::config::{DelayRange, ScraperConfig};

pub mod affiliate;
pub mod extractor;
pub mod fetcher;

use self::extractor::Extractor;
use self::fetcher::{FetchError, Fetcher, ReqwestTransport};

/// Anything that can return the raw bytes of a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Scraper wired to the real network.
pub type HttpScraper = Scraper<Fetcher<ReqwestTransport>>;

/// Limits and pacing shared by single and batch scrapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrapeSettings {
    pub product_limit: usize,
    pub batch_limit: usize,
    pub batch_delay: DelayRange,
    pub staleness_window: TimeDelta,
}

impl ScrapeSettings {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            product_limit: config.product_limit,
            batch_limit: config.batch_limit,
            batch_delay: config.batch_delay_ms,
            staleness_window: staleness_window(config.staleness_hours),
        }
    }
}

/// Fetches a category's listing page and extracts its ranked products.
pub struct Scraper<S> {
    source: S,
    extractor: Extractor,
    settings: ScrapeSettings,
    gate: Mutex<()>,
}

impl HttpScraper {
    pub fn from_config(config: &ScraperConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| FetchError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        Ok(Self::new(
            Fetcher::from_config(config)?,
            Extractor::new(base_url, config.affiliate_tag.clone()),
            ScrapeSettings::from_config(config),
        ))
    }
}

impl<S: PageSource> Scraper<S> {
    pub fn new(source: S, extractor: Extractor, settings: ScrapeSettings) -> Self {
        Self {
            source,
            extractor,
            settings,
            gate: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Wait for and hold this scraper's turn. Scrapes sharing a scraper
    /// run one after another.
    pub fn exclusive(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a panicked holder leaves nothing
        // inconsistent behind.
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Absolute URL of a category's listing page.
    pub fn listing_url(&self, href: &CategoryHref) -> Result<Url, FetchError> {
        self.extractor
            .base_url()
            .join(href.as_str())
            .map_err(|source| FetchError::InvalidUrl {
                url: href.to_string(),
                source,
            })
    }

    /// Fetch a listing and extract up to the configured number of products.
    ///
    /// An empty result means the page held nothing recognisable; only the
    /// fetch itself can fail.
    pub fn scrape_listing(&self, href: &CategoryHref) -> Result<Vec<NewProduct>, FetchError> {
        let url = self.listing_url(href)?;
        log::info!("Scraping products from: {url}");
        let page = self.source.fetch(url.as_str())?;
        Ok(self.extractor.extract(&page, self.settings.product_limit))
    }
}
