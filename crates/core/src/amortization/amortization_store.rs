use log::debug;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::amortization_model::{
    total_amortization, AmortizationCalculation, AmortizationCoaCodes, AmortizationItemInput,
    AmortizationItems, AmortizationPeriod, Asset, AssetGroup, AssetGroupInput, AssetInput,
    AssetType, EligibleMark, GroupedAssetGroups, JournalGeneration, MarkAmortizationMapping,
    MarkAmortizationSettings, MarkSettings,
};
use super::amortization_traits::AmortizationGatewayTrait;
use crate::errors::{Error, Result};
use crate::shared::{Ack, ReportPayload};
use crate::state::{or_default, read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};

#[derive(Default)]
struct AmortizationState {
    asset_groups: Vec<AssetGroup>,
    assets: Vec<Asset>,
    calculations: Vec<AmortizationCalculation>,
    settings: Map<String, Value>,
}

/// State behind the amortization pages.
///
/// Settings, account codes, mark settings and eligible marks are auxiliary
/// reads that fall back to defaults. Everything else records failures in the
/// error slot.
pub struct AmortizationStore {
    gateway: Arc<dyn AmortizationGatewayTrait>,
    state: RwLock<AmortizationState>,
    status: StatusCell,
    group_loads: RequestSequence,
    asset_loads: RequestSequence,
    mutations: Mutex<()>,
}

impl AmortizationStore {
    pub fn new(gateway: Arc<dyn AmortizationGatewayTrait>) -> Self {
        Self {
            gateway,
            state: RwLock::new(AmortizationState::default()),
            status: StatusCell::default(),
            group_loads: RequestSequence::default(),
            asset_loads: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn asset_groups(&self) -> Vec<AssetGroup> {
        read_lock(&self.state).asset_groups.clone()
    }

    pub fn grouped_asset_groups(&self) -> GroupedAssetGroups {
        GroupedAssetGroups::of(&read_lock(&self.state).asset_groups)
    }

    pub fn assets(&self) -> Vec<Asset> {
        read_lock(&self.state).assets.clone()
    }

    pub fn calculations(&self) -> Vec<AmortizationCalculation> {
        read_lock(&self.state).calculations.clone()
    }

    pub fn total_amortization(&self) -> Decimal {
        total_amortization(&read_lock(&self.state).calculations)
    }

    pub fn settings(&self) -> Map<String, Value> {
        read_lock(&self.state).settings.clone()
    }

    /// Serializes a mutating call and records its failure.
    async fn mutate<T, Fut>(&self, fallback: &str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        call.await.map_err(|e| self.status.fail(e, fallback))
    }

    fn reject(&self, err: Error, fallback: &str) -> Error {
        self.status.fail(err, fallback)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Asset groups
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn fetch_asset_groups(
        &self,
        company_id: Option<&str>,
        asset_type: Option<&AssetType>,
    ) -> Result<Vec<AssetGroup>> {
        let _loading = self.status.begin();
        let token = self.group_loads.issue();
        let groups = self
            .gateway
            .list_asset_groups(company_id, asset_type)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch asset groups"))?;
        if self.group_loads.is_latest(token) {
            debug!("Loaded {} asset groups", groups.len());
            write_lock(&self.state).asset_groups = groups.clone();
        }
        Ok(groups)
    }

    pub async fn create_asset_group(&self, input: AssetGroupInput) -> Result<Ack> {
        const FAILED: &str = "Failed to create asset group";
        input.validate().map_err(|e| self.reject(e, FAILED))?;
        self.mutate(FAILED, self.gateway.create_asset_group(&input))
            .await
    }

    pub async fn update_asset_group(&self, group_id: &str, input: AssetGroupInput) -> Result<Ack> {
        const FAILED: &str = "Failed to update asset group";
        input.validate().map_err(|e| self.reject(e, FAILED))?;
        self.mutate(FAILED, self.gateway.update_asset_group(group_id, &input))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registered assets
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn fetch_assets(&self, company_id: &str) -> Result<Vec<Asset>> {
        let _loading = self.status.begin();
        let token = self.asset_loads.issue();
        let assets = self
            .gateway
            .list_assets(company_id)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch assets"))?;
        if self.asset_loads.is_latest(token) {
            write_lock(&self.state).assets = assets.clone();
        }
        Ok(assets)
    }

    pub async fn create_asset(&self, input: AssetInput) -> Result<Ack> {
        const FAILED: &str = "Failed to create asset";
        input.validate().map_err(|e| self.reject(e, FAILED))?;
        self.mutate(FAILED, self.gateway.create_asset(&input)).await
    }

    pub async fn update_asset(&self, asset_id: &str, input: AssetInput) -> Result<Ack> {
        const FAILED: &str = "Failed to update asset";
        input.validate().map_err(|e| self.reject(e, FAILED))?;
        self.mutate(FAILED, self.gateway.update_asset(asset_id, &input))
            .await
    }

    /// Deletes an asset and drops it from the local list.
    pub async fn delete_asset(&self, asset_id: &str) -> Result<Ack> {
        let ack = self
            .mutate("Failed to delete asset", self.gateway.delete_asset(asset_id))
            .await?;
        write_lock(&self.state).assets.retain(|a| a.id != asset_id);
        Ok(ack)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Calculation
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn calculate_amortization(
        &self,
        company_id: &str,
        year: i32,
    ) -> Result<Vec<AmortizationCalculation>> {
        let _loading = self.status.begin();
        let period = AmortizationPeriod {
            company_id: company_id.to_string(),
            year,
        };
        let calculations = self
            .gateway
            .calculate(&period)
            .await
            .map_err(|e| self.status.fail(e, "Failed to calculate amortization"))?;
        write_lock(&self.state).calculations = calculations.clone();
        Ok(calculations)
    }

    pub async fn fetch_summary(&self, company_id: &str, year: i32) -> Result<ReportPayload> {
        let _loading = self.status.begin();
        let period = AmortizationPeriod {
            company_id: company_id.to_string(),
            year,
        };
        self.gateway
            .summary(&period)
            .await
            .map_err(|e| self.status.fail(e, "Failed to get amortization summary"))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Company settings; `{}` when unavailable.
    pub async fn fetch_settings(&self, company_id: Option<&str>) -> Map<String, Value> {
        let _loading = self.status.begin();
        let settings = or_default(
            self.gateway.get_settings(company_id).await,
            Map::new(),
            "Failed to fetch amortization settings",
        );
        write_lock(&self.state).settings = settings.clone();
        settings
    }

    pub async fn save_settings(&self, settings: Map<String, Value>) -> Result<Ack> {
        self.mutate("Failed to save settings", self.gateway.save_settings(&settings))
            .await
    }

    /// Expense account codes; `["5314"]` when unavailable.
    pub async fn fetch_coa_codes(&self, company_id: Option<&str>) -> AmortizationCoaCodes {
        let _loading = self.status.begin();
        or_default(
            self.gateway.coa_codes(company_id).await,
            AmortizationCoaCodes::default(),
            "Failed to fetch amortization COA codes",
        )
    }

    /// Mark-based settings; the built-in defaults when unavailable.
    pub async fn fetch_mark_settings(&self, company_id: Option<&str>) -> MarkSettings {
        let _loading = self.status.begin();
        or_default(
            self.gateway.mark_settings(company_id).await,
            MarkSettings::default(),
            "Failed to fetch mark settings",
        )
    }

    pub async fn save_mark_settings(
        &self,
        company_id: Option<&str>,
        settings: MarkAmortizationSettings,
    ) -> Result<Ack> {
        self.mutate(
            "Failed to save mark settings",
            self.gateway.save_mark_settings(company_id, &settings),
        )
        .await
    }

    pub async fn create_mark_mapping(&self, mapping: MarkAmortizationMapping) -> Result<Ack> {
        const FAILED: &str = "Failed to create mark mapping";
        if mapping.mark_id.trim().is_empty() {
            return Err(self.reject(Error::invalid_input("mark_id is required"), FAILED));
        }
        self.mutate(FAILED, self.gateway.create_mark_mapping(&mapping))
            .await
    }

    pub async fn update_mark_is_asset(&self, mark_id: &str, is_asset: bool) -> Result<Ack> {
        self.mutate(
            "Failed to update mark",
            self.gateway.update_mark_is_asset(mark_id, is_asset),
        )
        .await
    }

    /// Marks whose transactions can be amortized; empty when unavailable.
    pub async fn fetch_eligible_marks(&self, company_id: &str) -> Vec<EligibleMark> {
        let _loading = self.status.begin();
        or_default(
            self.gateway.eligible_marks(company_id).await,
            Vec::new(),
            "Failed to fetch amortization eligible marks",
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Amortization items
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn fetch_items(&self, company_id: &str, year: i32) -> Result<AmortizationItems> {
        let _loading = self.status.begin();
        self.gateway
            .list_items(company_id, year)
            .await
            .map_err(|e| self.status.fail(e, "Failed to fetch amortization items"))
    }

    pub async fn create_item(&self, input: AmortizationItemInput) -> Result<Ack> {
        const FAILED: &str = "Failed to create amortization item";
        input.validate().map_err(|e| self.reject(e, FAILED))?;
        self.mutate(FAILED, self.gateway.create_item(&input)).await
    }

    pub async fn update_item(&self, item_id: &str, input: AmortizationItemInput) -> Result<Ack> {
        const FAILED: &str = "Failed to update amortization item";
        input.validate().map_err(|e| self.reject(e, FAILED))?;
        self.mutate(FAILED, self.gateway.update_item(item_id, &input))
            .await
    }

    pub async fn delete_item(&self, item_id: &str) -> Result<Ack> {
        self.mutate(
            "Failed to delete amortization item",
            self.gateway.delete_item(item_id),
        )
        .await
    }

    /// Books journal entries for the year's manual items.
    pub async fn generate_journals(&self, company_id: &str, year: i32) -> Result<JournalGeneration> {
        let period = AmortizationPeriod {
            company_id: company_id.to_string(),
            year,
        };
        let generated = self
            .mutate(
                "Failed to generate amortization journals",
                self.gateway.generate_journal(&period),
            )
            .await?;
        debug!("Generated {} amortization journals", generated.journal_count);
        Ok(generated)
    }
}
