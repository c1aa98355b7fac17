//! Cost of goods (HPP) batches - groups of purchase transactions whose total
//! is spread over the products they bought.

mod batches_model;
mod batches_store;
mod batches_traits;


pub use batches_model::{
    allocate_costs, BatchDetails, BatchProduct, BatchProductInput, BatchTransaction,
    BatchUnitPrice, CostAllocation, HppBatch, SaveBatchRequest, SavedBatch,
};
pub use batches_store::BatchStore;
pub use batches_traits::BatchGatewayTrait;
