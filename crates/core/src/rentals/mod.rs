//! Rental contracts for shop locations, and the payments linked to them.

mod rentals_model;
mod rentals_store;
mod rentals_traits;


pub use rentals_model::*;
pub use rentals_store::RentalStore;
pub use rentals_traits::RentalGatewayTrait;
