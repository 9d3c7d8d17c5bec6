use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradebookConfig {
    /// Upper bound for a single page fetch, in milliseconds. Zero means the default.
    pub request_timeout_ms: u64,
    /// How many week pages of a quarter are fetched at the same time.
    pub max_concurrent_pages: usize,
}

impl GradebookConfig {
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;
    pub const MAX_CONCURRENT_PAGES: usize = 4;

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_concurrent_pages(mut self, pages: usize) -> Self {
        self.max_concurrent_pages = pages;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_ms {
            0 => Duration::from_millis(Self::REQUEST_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }

    pub(crate) fn concurrency(&self) -> usize {
        self.max_concurrent_pages.max(1)
    }
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: Self::REQUEST_TIMEOUT_MS,
            max_concurrent_pages: Self::MAX_CONCURRENT_PAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GradebookConfig =
            serde_json::from_str(r#"{ "max_concurrent_pages": 8 }"#).unwrap();
        assert_eq!(config.max_concurrent_pages, 8);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let config: GradebookConfig =
            serde_json::from_str(r#"{ "request_timeout_ms": 0 }"#).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        let config = GradebookConfig::default().with_request_timeout(Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn zero_concurrency_still_makes_progress() {
        let config = GradebookConfig::default().with_max_concurrent_pages(0);
        assert_eq!(config.concurrency(), 1);
    }
}
