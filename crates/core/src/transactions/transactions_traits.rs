use async_trait::async_trait;

use crate::errors::Result;
use crate::shared::{Ack, BlobResponse};
use crate::transactions::transactions_model::{
    DeleteBySourceRequest, Transaction, TransactionExportRequest, UploadSummary,
};

/// Remote calls for the `/transactions` resource.
#[async_trait]
pub trait TransactionGatewayTrait: Send + Sync {
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<Ack>;
    async fn bulk_delete(&self, transaction_ids: &[String]) -> Result<Ack>;

    /// `None` clears the mark.
    async fn assign_mark(&self, transaction_id: &str, mark_id: Option<&str>) -> Result<Ack>;
    async fn bulk_assign_mark(&self, transaction_ids: &[String], mark_id: Option<&str>)
        -> Result<Ack>;

    /// `None` detaches the transaction from its company.
    async fn assign_company(&self, transaction_id: &str, company_id: Option<&str>)
        -> Result<Ack>;
    async fn bulk_assign_company(
        &self,
        transaction_ids: &[String],
        company_id: Option<&str>,
    ) -> Result<Ack>;

    async fn update_notes(&self, transaction_id: &str, notes: &str) -> Result<Ack>;
    async fn upload_summary(&self) -> Result<Vec<UploadSummary>>;
    async fn delete_by_source(&self, request: &DeleteBySourceRequest) -> Result<Ack>;
    async fn export_transactions(&self, request: &TransactionExportRequest)
        -> Result<BlobResponse>;
}
