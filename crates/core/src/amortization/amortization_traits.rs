use async_trait::async_trait;
use serde_json::{Map, Value};

use super::amortization_model::{
    AmortizationCalculation, AmortizationCoaCodes, AmortizationItemInput, AmortizationItems,
    AmortizationPeriod, Asset, AssetGroup, AssetGroupInput, AssetInput, AssetType, EligibleMark,
    JournalGeneration, MarkAmortizationMapping, MarkAmortizationSettings, MarkSettings,
};
use crate::errors::Result;
use crate::shared::{Ack, ReportPayload};

/// Remote calls for `/amortization`, `/amortization-items` and the asset
/// flags on marks.
#[async_trait]
pub trait AmortizationGatewayTrait: Send + Sync {
    async fn list_asset_groups(
        &self,
        company_id: Option<&str>,
        asset_type: Option<&AssetType>,
    ) -> Result<Vec<AssetGroup>>;
    async fn create_asset_group(&self, input: &AssetGroupInput) -> Result<Ack>;
    async fn update_asset_group(&self, group_id: &str, input: &AssetGroupInput) -> Result<Ack>;

    async fn list_assets(&self, company_id: &str) -> Result<Vec<Asset>>;
    async fn create_asset(&self, input: &AssetInput) -> Result<Ack>;
    async fn update_asset(&self, asset_id: &str, input: &AssetInput) -> Result<Ack>;
    async fn delete_asset(&self, asset_id: &str) -> Result<Ack>;

    async fn calculate(&self, period: &AmortizationPeriod) -> Result<Vec<AmortizationCalculation>>;
    async fn summary(&self, period: &AmortizationPeriod) -> Result<ReportPayload>;

    async fn get_settings(&self, company_id: Option<&str>) -> Result<Map<String, Value>>;
    async fn save_settings(&self, settings: &Map<String, Value>) -> Result<Ack>;
    async fn coa_codes(&self, company_id: Option<&str>) -> Result<AmortizationCoaCodes>;
    async fn mark_settings(&self, company_id: Option<&str>) -> Result<MarkSettings>;
    async fn save_mark_settings(
        &self,
        company_id: Option<&str>,
        settings: &MarkAmortizationSettings,
    ) -> Result<Ack>;
    async fn create_mark_mapping(&self, mapping: &MarkAmortizationMapping) -> Result<Ack>;
    async fn update_mark_is_asset(&self, mark_id: &str, is_asset: bool) -> Result<Ack>;
    async fn eligible_marks(&self, company_id: &str) -> Result<Vec<EligibleMark>>;

    async fn list_items(&self, company_id: &str, year: i32) -> Result<AmortizationItems>;
    async fn create_item(&self, input: &AmortizationItemInput) -> Result<Ack>;
    async fn update_item(&self, item_id: &str, input: &AmortizationItemInput) -> Result<Ack>;
    async fn delete_item(&self, item_id: &str) -> Result<Ack>;
    async fn generate_journal(&self, period: &AmortizationPeriod) -> Result<JournalGeneration>;
}
