//! Polite, retrying page fetcher.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, DNT, HeaderMap, HeaderValue, USER_AGENT,
};
use thiserror::Error;

use crate::crawl::PageSource;
use crate::models::config::{DelayRange, ScraperConfig};

/// Failure of a single HTTP attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
}

/// Terminal failure of [`Fetcher::fetch`] or of building a fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url} after {attempts} attempt(s): {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        source: TransportError,
    },
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("invalid header value: {0}")]
    InvalidHeader(String),
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Issues a single GET and returns the body of a 2xx response.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// Blocking `reqwest` transport presenting itself as a desktop browser.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::InvalidHeader(e.to_string()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        // Accept-Encoding (gzip, deflate, br) is negotiated by the client so
        // that bodies are decoded transparently.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Attempt budget and the jittered sleeps around each attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub polite_delay: DelayRange,
    pub retry_delay: DelayRange,
}

impl RetryPolicy {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            polite_delay: config.polite_delay_ms,
            retry_delay: config.retry_delay_ms,
        }
    }
}

/// Fetches pages one at a time, sleeping before every attempt and backing
/// off between failed ones.
pub struct Fetcher<T = ReqwestTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl Fetcher<ReqwestTransport> {
    pub fn from_config(config: &ScraperConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            ReqwestTransport::new(config)?,
            RetryPolicy::from_config(config),
        ))
    }
}

impl<T: HttpTransport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch `url`, retrying any transport failure or non-2xx status until
    /// the attempt budget is spent.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            self.policy.polite_delay.pause();
            match self.transport.get(url) {
                Ok(body) => {
                    log::debug!("Fetched {url} ({} bytes) on attempt {attempt}", body.len());
                    return Ok(body);
                }
                Err(source) => {
                    log::warn!("Attempt {attempt} failed for {url}: {source}");
                    if attempt >= attempts {
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts,
                            source,
                        });
                    }
                    self.policy.retry_delay.pause();
                    attempt += 1;
                }
            }
        }
    }
}

impl<T: HttpTransport> PageSource for Fetcher<T> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Fetcher::fetch(self, url)
    }
}
