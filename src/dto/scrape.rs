use serde::Serialize;

/// Outcome of one category within a batch scrape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchScrapeResult {
    pub category_id: i32,
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
