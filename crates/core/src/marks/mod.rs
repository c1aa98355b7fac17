//! Marks module - categorization tags for transactions.

mod marks_model;
mod marks_store;
mod marks_traits;


pub use marks_model::{sort_marks_by_label, Mark, MarkInput, MarkMappingSummary};
pub use marks_store::MarkStore;
pub use marks_traits::MarkGatewayTrait;
