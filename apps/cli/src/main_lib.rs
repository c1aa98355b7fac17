use std::sync::Arc;

use ledgerdesk_client::ApiClient;
use ledgerdesk_core::transactions::SortConfig;
use ledgerdesk_core::{Gateways, Session, SessionConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn open_session(config: &Config, sort: Option<SortConfig>) -> anyhow::Result<Session> {
    let client = Arc::new(ApiClient::new(config.client_config())?);
    tracing::debug!("Using API at {}", client.api_url());
    let session_config = SessionConfig {
        page_size: config.page_size,
        default_sort: sort.unwrap_or_default(),
        ..Default::default()
    };
    Ok(Session::new(Gateways::from_client(client), session_config))
}
