//! Transport configuration.

use std::time::Duration;

/// Default request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`crate::HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl TransportConfig {
    /// Create a configuration for the given backend base URL.
    ///
    /// A trailing slash is stripped so endpoint paths can always start
    /// with `/`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = TransportConfig::new("https://api.example/");
        assert_eq!(config.base_url, "https://api.example");
    }

    #[test]
    fn timeout_is_configurable() {
        let config =
            TransportConfig::new("https://api.example").with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
