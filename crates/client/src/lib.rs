//! LedgerDesk Client - HTTP implementation of the core gateway traits.
//!
//! One [`ApiClient`] owns the configured `reqwest::Client` and implements
//! every call group (transactions, companies, marks, chart of accounts,
//! reports, amortization, products, HPP batches, rentals, converter and
//! saved filters) on top of it.

mod amortization;
mod batches;
mod client;
mod coa;
mod companies;
mod config;
mod converter;
mod filters;
mod marks;
mod products;
mod rentals;
mod reports;
mod transactions;

pub use client::ApiClient;
pub use config::{ClientConfig, API_PREFIX, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
