//! Chart of accounts module - ledger accounts and mark-to-account mappings.

mod coa_model;
mod coa_store;
mod coa_traits;


pub use coa_model::{
    coa_by_category, coa_options, ChartOfAccount, CoaCategory, CoaGroups, CoaInput, CoaOption,
    MappingType, MarkCoaMapping, NewMarkCoaMapping,
};
pub use coa_store::CoaStore;
pub use coa_traits::CoaGatewayTrait;
