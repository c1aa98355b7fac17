use async_trait::async_trait;

use super::batches_model::{BatchDetails, BatchTransaction, HppBatch, SaveBatchRequest, SavedBatch};
use crate::errors::Result;
use crate::shared::Ack;

/// Remote calls for `/hpp-batches`.
#[async_trait]
pub trait BatchGatewayTrait: Send + Sync {
    async fn list_batches(&self, company_id: Option<&str>) -> Result<Vec<HppBatch>>;
    async fn batch_details(&self, batch_id: &str) -> Result<BatchDetails>;
    async fn linkable_transactions(
        &self,
        company_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<BatchTransaction>>;
    async fn save_batch(&self, request: &SaveBatchRequest) -> Result<SavedBatch>;
    async fn delete_batch(&self, batch_id: &str) -> Result<Ack>;
}
