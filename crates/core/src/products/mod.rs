//! Products module - sellable items used by the cost of goods batches.

mod products_model;
mod products_store;
mod products_traits;

pub use products_model::{Product, ProductInput};
pub use products_store::ProductStore;
pub use products_traits::ProductGatewayTrait;
