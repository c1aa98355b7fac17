//! Companies module - tenant records, gateway trait and store.

mod companies_model;
mod companies_store;
mod companies_traits;


pub use companies_model::{Company, CompanyInput};
pub use companies_store::CompanyStore;
pub use companies_traits::CompanyGatewayTrait;
