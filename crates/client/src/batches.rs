use async_trait::async_trait;

use ledgerdesk_core::batches::{
    BatchDetails, BatchGatewayTrait, BatchTransaction, HppBatch, SaveBatchRequest, SavedBatch,
};
use ledgerdesk_core::errors::Result;
use ledgerdesk_core::shared::Ack;

use crate::client::{opt, segment, ApiClient};

#[async_trait]
impl BatchGatewayTrait for ApiClient {
    async fn list_batches(&self, company_id: Option<&str>) -> Result<Vec<HppBatch>> {
        self.get_field(
            "/hpp-batches",
            &[("company_id", opt(company_id))],
            "batches",
        )
        .await
    }

    async fn batch_details(&self, batch_id: &str) -> Result<BatchDetails> {
        self.get(&format!("/hpp-batches/{}", segment(batch_id)), &[])
            .await
    }

    async fn linkable_transactions(
        &self,
        company_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<BatchTransaction>> {
        self.get_field(
            "/transactions/linkable-to-hpp",
            &[
                ("company_id", Some(company_id.to_string())),
                ("start_date", opt(start_date)),
                ("end_date", opt(end_date)),
            ],
            "transactions",
        )
        .await
    }

    async fn save_batch(&self, request: &SaveBatchRequest) -> Result<SavedBatch> {
        self.post("/hpp-batches", request).await
    }

    async fn delete_batch(&self, batch_id: &str) -> Result<Ack> {
        self.delete(&format!("/hpp-batches/{}", segment(batch_id)))
            .await
    }
}
