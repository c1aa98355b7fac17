//! LedgerDesk Core - Domain models, stores, and gateway traits.
//!
//! This crate holds the UI-facing state of the bookkeeping front-end: one
//! store per business area plus the transaction list view-model. It is
//! transport-agnostic and defines gateway traits that are implemented by the
//! `ledgerdesk-client` crate.

pub mod amortization;
pub mod batches;
pub mod coa;
pub mod companies;
pub mod constants;
pub mod converter;
pub mod errors;
pub mod exports;
pub mod filters;
pub mod marks;
pub mod products;
pub mod rentals;
pub mod reports;
pub mod routes;
pub mod session;
pub mod shared;
pub mod transactions;
pub mod utils;

mod state;

#[cfg(test)]
mod test_support;

pub use session::{Gateways, Session, SessionConfig};
pub use state::StoreStatus;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
