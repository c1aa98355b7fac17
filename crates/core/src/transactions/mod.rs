//! Transactions module - bank mutations, the list view-model and the
//! history store that drives them.

mod filters_model;
mod history_store;
mod transactions_model;
mod transactions_traits;
mod view_model;

#[cfg(test)]
mod history_store_tests;

pub use filters_model::{FilterUpdate, MarkStatus, TransactionFilters};
pub use history_store::{HistoryStore, HistoryStoreDeps};
pub use transactions_model::{
    DbCr, DeleteBySourceRequest, Transaction, TransactionExportRequest, UploadSummary,
};
pub use transactions_traits::TransactionGatewayTrait;
pub use view_model::{SortConfig, SortDirection, SortKey, Totals, TransactionListView};
