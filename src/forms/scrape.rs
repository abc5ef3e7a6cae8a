use serde::Deserialize;
use validator::Validate;

pub const MAX_BATCH_LIMIT: usize = 100;

/// Optional body of a batch scrape request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BatchScrapeForm {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl BatchScrapeForm {
    /// Requested category count, or `default` when none was given.
    pub fn limit_or(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).min(MAX_BATCH_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_limit() {
        assert_eq!(BatchScrapeForm::default().limit_or(5), 5);
    }

    #[test]
    fn rejects_zero_limit() {
        let form = BatchScrapeForm { limit: Some(0) };
        assert!(form.validate().is_err());
    }

    #[test]
    fn accepts_explicit_limit() {
        let form = BatchScrapeForm { limit: Some(12) };
        assert!(form.validate().is_ok());
        assert_eq!(form.limit_or(5), 12);
    }
}
