use async_trait::async_trait;
use serde_json::json;

use ledgerdesk_core::errors::Result;
use ledgerdesk_core::shared::{Ack, BlobResponse};
use ledgerdesk_core::transactions::{
    DeleteBySourceRequest, Transaction, TransactionExportRequest, TransactionGatewayTrait,
    UploadSummary,
};

use crate::client::{segment, ApiClient};

#[async_trait]
impl TransactionGatewayTrait for ApiClient {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_field("/transactions", &[], "transactions").await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Ack> {
        self.delete(&format!("/transactions/{}", segment(transaction_id)))
            .await
    }

    async fn bulk_delete(&self, transaction_ids: &[String]) -> Result<Ack> {
        self.post(
            "/transactions/bulk-delete",
            &json!({ "transaction_ids": transaction_ids }),
        )
        .await
    }

    async fn assign_mark(&self, transaction_id: &str, mark_id: Option<&str>) -> Result<Ack> {
        self.post(
            &format!("/transactions/{}/assign-mark", segment(transaction_id)),
            &json!({ "mark_id": mark_id }),
        )
        .await
    }

    async fn bulk_assign_mark(
        &self,
        transaction_ids: &[String],
        mark_id: Option<&str>,
    ) -> Result<Ack> {
        self.post(
            "/transactions/bulk-mark",
            &json!({ "transaction_ids": transaction_ids, "mark_id": mark_id }),
        )
        .await
    }

    async fn assign_company(
        &self,
        transaction_id: &str,
        company_id: Option<&str>,
    ) -> Result<Ack> {
        self.post(
            &format!("/transactions/{}/assign-company", segment(transaction_id)),
            &json!({ "company_id": company_id }),
        )
        .await
    }

    async fn bulk_assign_company(
        &self,
        transaction_ids: &[String],
        company_id: Option<&str>,
    ) -> Result<Ack> {
        self.post(
            "/transactions/bulk-assign-company",
            &json!({ "transaction_ids": transaction_ids, "company_id": company_id }),
        )
        .await
    }

    async fn update_notes(&self, transaction_id: &str, notes: &str) -> Result<Ack> {
        self.put(
            &format!("/transactions/{}/notes", segment(transaction_id)),
            &json!({ "notes": notes }),
        )
        .await
    }

    async fn upload_summary(&self) -> Result<Vec<UploadSummary>> {
        self.get_field("/transactions/upload-summary", &[], "summary")
            .await
    }

    async fn delete_by_source(&self, request: &DeleteBySourceRequest) -> Result<Ack> {
        self.post("/transactions/delete-by-source", request).await
    }

    async fn export_transactions(
        &self,
        request: &TransactionExportRequest,
    ) -> Result<BlobResponse> {
        self.post_for_blob("/transactions/export", request).await
    }
}
