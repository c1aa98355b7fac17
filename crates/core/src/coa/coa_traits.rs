use async_trait::async_trait;

use crate::coa::coa_model::{ChartOfAccount, CoaInput, MarkCoaMapping, NewMarkCoaMapping};
use crate::errors::Result;
use crate::shared::Ack;

/// Remote calls for `/coa` and the mark-to-account mappings.
#[async_trait]
pub trait CoaGatewayTrait: Send + Sync {
    async fn list_coa(&self) -> Result<Vec<ChartOfAccount>>;
    async fn create_coa(&self, input: &CoaInput) -> Result<Ack>;
    async fn update_coa(&self, coa_id: &str, input: &CoaInput) -> Result<Ack>;
    async fn delete_coa(&self, coa_id: &str) -> Result<Ack>;

    async fn list_mark_mappings(&self, mark_id: &str) -> Result<Vec<MarkCoaMapping>>;
    async fn create_mark_mapping(&self, mark_id: &str, mapping: &NewMarkCoaMapping)
        -> Result<Ack>;
    async fn delete_mark_mapping(&self, mapping_id: &str) -> Result<Ack>;
}
