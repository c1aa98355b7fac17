use async_trait::async_trait;
use serde_json::{json, Map, Value};

use ledgerdesk_core::amortization::{
    AmortizationCalculation, AmortizationCoaCodes, AmortizationGatewayTrait,
    AmortizationItemInput, AmortizationItems, AmortizationPeriod, Asset, AssetGroup,
    AssetGroupInput, AssetInput, AssetType, EligibleMark, JournalGeneration,
    MarkAmortizationMapping, MarkAmortizationSettings, MarkSettings,
};
use ledgerdesk_core::errors::{Error, Result};
use ledgerdesk_core::shared::{Ack, ReportPayload};

use crate::client::{opt, segment, unwrap_field, ApiClient};

fn period_query(period: &AmortizationPeriod) -> [(&'static str, Option<String>); 2] {
    [
        ("company_id", Some(period.company_id.clone())),
        ("year", Some(period.year.to_string())),
    ]
}

#[async_trait]
impl AmortizationGatewayTrait for ApiClient {
    async fn list_asset_groups(
        &self,
        company_id: Option<&str>,
        asset_type: Option<&AssetType>,
    ) -> Result<Vec<AssetGroup>> {
        self.get_field(
            "/amortization/asset-groups",
            &[
                ("company_id", opt(company_id)),
                ("asset_type", asset_type.map(|t| t.as_str().to_string())),
            ],
            "groups",
        )
        .await
    }

    async fn create_asset_group(&self, input: &AssetGroupInput) -> Result<Ack> {
        self.post("/amortization/asset-groups", input).await
    }

    async fn update_asset_group(&self, group_id: &str, input: &AssetGroupInput) -> Result<Ack> {
        self.put(
            &format!("/amortization/asset-groups/{}", segment(group_id)),
            input,
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Assets
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_assets(&self, company_id: &str) -> Result<Vec<Asset>> {
        self.get_field(
            "/amortization/assets",
            &[("company_id", Some(company_id.to_string()))],
            "assets",
        )
        .await
    }

    async fn create_asset(&self, input: &AssetInput) -> Result<Ack> {
        self.post("/amortization/assets", input).await
    }

    async fn update_asset(&self, asset_id: &str, input: &AssetInput) -> Result<Ack> {
        self.put(&format!("/amortization/assets/{}", segment(asset_id)), input)
            .await
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<Ack> {
        self.delete(&format!("/amortization/assets/{}", segment(asset_id)))
            .await
    }

    async fn calculate(&self, period: &AmortizationPeriod) -> Result<Vec<AmortizationCalculation>> {
        let body: Value = self.post("/amortization/calculate", period).await?;
        unwrap_field(body, "calculations")
    }

    async fn summary(&self, period: &AmortizationPeriod) -> Result<ReportPayload> {
        self.get("/amortization/summary", &period_query(period)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    async fn get_settings(&self, company_id: Option<&str>) -> Result<Map<String, Value>> {
        self.get_field(
            "/amortization/settings",
            &[("company_id", opt(company_id))],
            "settings",
        )
        .await
    }

    async fn save_settings(&self, settings: &Map<String, Value>) -> Result<Ack> {
        self.post("/amortization/settings", settings).await
    }

    async fn coa_codes(&self, company_id: Option<&str>) -> Result<AmortizationCoaCodes> {
        self.get(
            "/amortization/coa-codes",
            &[("company_id", opt(company_id))],
        )
        .await
    }

    async fn mark_settings(&self, company_id: Option<&str>) -> Result<MarkSettings> {
        self.get(
            "/amortization/mark-settings",
            &[("company_id", opt(company_id))],
        )
        .await
    }

    async fn save_mark_settings(
        &self,
        company_id: Option<&str>,
        settings: &MarkAmortizationSettings,
    ) -> Result<Ack> {
        let mut body = match serde_json::to_value(settings)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::Unexpected(format!(
                    "mark settings serialized to {}",
                    other
                )))
            }
        };
        if let Some(company_id) = company_id {
            body.insert("company_id".to_string(), json!(company_id));
        }
        self.post("/amortization/mark-settings", &body).await
    }

    async fn create_mark_mapping(&self, mapping: &MarkAmortizationMapping) -> Result<Ack> {
        self.post("/amortization/mark-mapping", mapping).await
    }

    async fn update_mark_is_asset(&self, mark_id: &str, is_asset: bool) -> Result<Ack> {
        self.put(
            &format!("/marks/{}/is-asset", segment(mark_id)),
            &json!({ "is_asset": is_asset }),
        )
        .await
    }

    async fn eligible_marks(&self, company_id: &str) -> Result<Vec<EligibleMark>> {
        self.get_field(
            "/marks/amortization-eligible",
            &[("company_id", Some(company_id.to_string()))],
            "marks",
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Items
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_items(&self, company_id: &str, year: i32) -> Result<AmortizationItems> {
        self.get(
            "/amortization-items",
            &[
                ("company_id", Some(company_id.to_string())),
                ("year", Some(year.to_string())),
            ],
        )
        .await
    }

    async fn create_item(&self, input: &AmortizationItemInput) -> Result<Ack> {
        self.post("/amortization-items", input).await
    }

    async fn update_item(&self, item_id: &str, input: &AmortizationItemInput) -> Result<Ack> {
        self.put(&format!("/amortization-items/{}", segment(item_id)), input)
            .await
    }

    async fn delete_item(&self, item_id: &str) -> Result<Ack> {
        self.delete(&format!("/amortization-items/{}", segment(item_id)))
            .await
    }

    async fn generate_journal(&self, period: &AmortizationPeriod) -> Result<JournalGeneration> {
        self.post("/amortization-items/generate-journal", period).await
    }
}
