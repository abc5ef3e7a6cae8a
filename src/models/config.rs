use std::time::Duration;

use serde::Deserialize;

/// Configuration options for the scraper service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Interface the HTTP server binds to.
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// Tunables for fetching and extracting listing pages.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root that category hrefs and product links are resolved against.
    pub base_url: String,
    pub affiliate_tag: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    /// Sleep before every request.
    pub polite_delay_ms: DelayRange,
    /// Extra sleep after a failed attempt.
    pub retry_delay_ms: DelayRange,
    /// Sleep after each category of a batch.
    pub batch_delay_ms: DelayRange,
    /// Maximum number of products kept per category.
    pub product_limit: usize,
    pub staleness_hours: u32,
    /// Default number of categories processed by one batch request.
    pub batch_limit: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amazon.com".to_string(),
            affiliate_tag: "your-tag-20".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            request_timeout_secs: 15,
            max_attempts: 3,
            polite_delay_ms: DelayRange::new(2_000, 5_000),
            retry_delay_ms: DelayRange::new(3_000, 7_000),
            batch_delay_ms: DelayRange::new(10_000, 15_000),
            product_limit: 10,
            staleness_hours: 24,
            batch_limit: 5,
        }
    }
}

/// Inclusive range of milliseconds a jittered sleep is drawn from.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// A range that never sleeps.
    pub const fn none() -> Self {
        Self { min: 0, max: 0 }
    }

    /// Draw a uniformly distributed delay. Bounds given in the wrong order
    /// are swapped.
    pub fn sample(&self) -> Duration {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        Duration::from_millis(fastrand::u64(low..=high))
    }

    /// Block the current thread for a sampled delay.
    pub fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            log::trace!("Sleeping for {delay:?}");
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_within_bounds() {
        let range = DelayRange::new(2_000, 5_000);
        for _ in 0..100 {
            let delay = range.sample();
            assert!(delay >= Duration::from_millis(2_000));
            assert!(delay <= Duration::from_millis(5_000));
        }
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let delay = DelayRange::new(30, 10).sample();
        assert!(delay >= Duration::from_millis(10) && delay <= Duration::from_millis(30));
    }

    #[test]
    fn empty_range_is_zero() {
        assert!(DelayRange::none().sample().is_zero());
    }
}
