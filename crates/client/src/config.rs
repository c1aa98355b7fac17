use std::time::Duration;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Prefix shared by every endpoint.
pub const API_PREFIX: &str = "/api";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, without the `/api` prefix.
    pub base_url: String,
    pub timeout: Duration,
    /// Sent as `Authorization: Bearer ...` when set.
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// `{base_url}/api`, tolerating a trailing slash or an explicit prefix.
    pub fn api_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with(API_PREFIX) {
            base.to_string()
        } else {
            format!("{}{}", base, API_PREFIX)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_normalization() {
        assert_eq!(ClientConfig::default().api_url(), "http://localhost:5000/api");
        assert_eq!(
            ClientConfig::new("https://books.example.com/").api_url(),
            "https://books.example.com/api"
        );
        assert_eq!(
            ClientConfig::new("https://books.example.com/api/").api_url(),
            "https://books.example.com/api"
        );
    }
}
