use async_trait::async_trait;

use ledgerdesk_core::coa::{
    ChartOfAccount, CoaGatewayTrait, CoaInput, MarkCoaMapping, NewMarkCoaMapping,
};
use ledgerdesk_core::errors::Result;
use ledgerdesk_core::shared::Ack;

use crate::client::{segment, ApiClient};

#[async_trait]
impl CoaGatewayTrait for ApiClient {
    async fn list_coa(&self) -> Result<Vec<ChartOfAccount>> {
        self.get_field("/coa", &[], "coa").await
    }

    async fn create_coa(&self, input: &CoaInput) -> Result<Ack> {
        self.post("/coa", input).await
    }

    async fn update_coa(&self, coa_id: &str, input: &CoaInput) -> Result<Ack> {
        self.put(&format!("/coa/{}", segment(coa_id)), input).await
    }

    async fn delete_coa(&self, coa_id: &str) -> Result<Ack> {
        self.delete(&format!("/coa/{}", segment(coa_id))).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mark mappings
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_mark_mappings(&self, mark_id: &str) -> Result<Vec<MarkCoaMapping>> {
        self.get_field(
            &format!("/marks/{}/coa-mappings", segment(mark_id)),
            &[],
            "mappings",
        )
        .await
    }

    async fn create_mark_mapping(
        &self,
        mark_id: &str,
        mapping: &NewMarkCoaMapping,
    ) -> Result<Ack> {
        self.post(
            &format!("/marks/{}/coa-mappings", segment(mark_id)),
            mapping,
        )
        .await
    }

    async fn delete_mark_mapping(&self, mapping_id: &str) -> Result<Ack> {
        self.delete(&format!("/mark-coa-mappings/{}", segment(mapping_id)))
            .await
    }
}
