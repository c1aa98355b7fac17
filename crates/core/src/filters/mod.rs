//! Saved-filter persistence, keyed by logical view name.

mod filters_persistence;
mod filters_traits;

pub use filters_persistence::FilterPersistence;
pub use filters_traits::FilterGatewayTrait;
