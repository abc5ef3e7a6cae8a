//! Response envelopes. Every body carries a `success` flag.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dto::categories::CategoryDto;
use crate::dto::products::ProductDto;
use crate::dto::scrape::BatchScrapeResult;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryProductsResponse {
    pub success: bool,
    pub category: CategoryDto,
    pub count: usize,
    pub products: Vec<ProductDto>,
}

impl CategoryProductsResponse {
    pub fn new(category: CategoryDto, products: Vec<ProductDto>) -> Self {
        Self {
            success: true,
            category,
            count: products.len(),
            products,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchScrapeResponse {
    pub success: bool,
    pub processed: usize,
    pub results: Vec<BatchScrapeResult>,
}

impl From<Vec<BatchScrapeResult>> for BatchScrapeResponse {
    fn from(results: Vec<BatchScrapeResult>) -> Self {
        Self {
            success: true,
            processed: results.len(),
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub database_connected: bool,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_counts_items() {
        let value = serde_json::to_value(ListResponse::from(vec![1, 2, 3])).unwrap();

        assert_eq!(
            value,
            serde_json::json!({ "success": true, "data": [1, 2, 3], "count": 3 })
        );
    }

    #[test]
    fn batch_results_omit_missing_errors() {
        let response = BatchScrapeResponse::from(vec![
            BatchScrapeResult {
                category_id: 1,
                name: "Electronics".into(),
                success: true,
                error: None,
            },
            BatchScrapeResult {
                category_id: 2,
                name: "Books".into(),
                success: false,
                error: Some("database error".into()),
            },
        ]);

        let value = serde_json::to_value(response).unwrap();

        assert_eq!(value["processed"], 2);
        assert!(value["results"][0].get("error").is_none());
        assert_eq!(value["results"][1]["error"], "database error");
    }

    #[test]
    fn errors_report_failure() {
        let value = serde_json::to_value(ErrorResponse::new("Category not found")).unwrap();

        assert_eq!(
            value,
            serde_json::json!({ "success": false, "error": "Category not found" })
        );
    }
}
