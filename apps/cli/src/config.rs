use std::path::PathBuf;
use std::time::Duration;

use ledgerdesk_client::{ClientConfig, DEFAULT_BASE_URL};
use ledgerdesk_core::constants::DEFAULT_PAGE_SIZE;

pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub token: Option<String>,
    pub page_size: usize,
    pub export_dir: PathBuf,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = var("LEDGERDESK_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_ms: u64 = var("LEDGERDESK_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);
        let token = var("LEDGERDESK_TOKEN").filter(|t| !t.trim().is_empty());
        let page_size = var("LEDGERDESK_PAGE_SIZE")
            .and_then(|v| v.parse().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let export_dir = var("LEDGERDESK_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_json = var("LEDGERDESK_LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));
        Self {
            api_url,
            request_timeout: Duration::from_millis(timeout_ms),
            token,
            page_size,
            export_dir,
            log_json,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: self.request_timeout,
            token: self.token.clone(),
        }
    }
}
