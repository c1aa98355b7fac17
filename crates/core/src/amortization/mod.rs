//! Amortization module - fixed asset groups, registered assets, mark-based
//! amortization items and their settings.

mod amortization_model;
mod amortization_store;
mod amortization_traits;

#[cfg(test)]
mod amortization_store_tests;

pub use amortization_model::*;
pub use amortization_store::AmortizationStore;
pub use amortization_traits::AmortizationGatewayTrait;
