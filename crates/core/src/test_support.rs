//! In-memory backend shared by the store tests.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::amortization::{
    AmortizationCalculation, AmortizationCoaCodes, AmortizationGatewayTrait,
    AmortizationItemInput, AmortizationItems, AmortizationPeriod, Asset, AssetGroup,
    AssetGroupInput, AssetInput, AssetType, EligibleMark, JournalGeneration,
    MarkAmortizationMapping, MarkAmortizationSettings, MarkSettings,
};
use crate::coa::{ChartOfAccount, CoaCategory, CoaGatewayTrait, CoaInput, MarkCoaMapping, NewMarkCoaMapping};
use crate::companies::{Company, CompanyGatewayTrait, CompanyInput};
use crate::errors::{Error, Result};
use crate::filters::FilterGatewayTrait;
use crate::marks::{Mark, MarkGatewayTrait, MarkInput};
use crate::shared::{Ack, BlobResponse, ReportPayload};
use crate::transactions::{
    DbCr, DeleteBySourceRequest, Transaction, TransactionExportRequest,
    TransactionGatewayTrait, UploadSummary,
};

/// Mock backend holding every collection the stores read.
#[derive(Default)]
pub struct MockBackend {
    pub transactions: Mutex<Vec<Transaction>>,
    pub companies: Mutex<Vec<Company>>,
    pub marks: Mutex<Vec<Mark>>,
    pub coa: Mutex<Vec<ChartOfAccount>>,
    pub filters: Mutex<HashMap<String, Value>>,
    pub calls: Mutex<Vec<String>>,
    pub exports: Mutex<Vec<TransactionExportRequest>>,
    /// Operation names that answer with a server error.
    pub failing: Mutex<HashSet<&'static str>>,
    /// Delays applied to successive `list_transactions` calls.
    pub list_delays: Mutex<Vec<Duration>>,
    pub filter_saves: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl MockBackend {
    pub fn with_transactions(transactions: Vec<Transaction>) -> Arc<Self> {
        let backend = Self::default();
        *backend.transactions.lock().unwrap() = transactions;
        Arc::new(backend)
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn transaction_ids(&self) -> Vec<String> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(Error::api(500, Some(format!("{} rejected", operation))));
        }
        Ok(())
    }

    fn update_transactions(&self, ids: &[String], f: impl Fn(&mut Transaction)) {
        let mut transactions = self.transactions.lock().unwrap();
        for txn in transactions.iter_mut().filter(|t| ids.contains(&t.id)) {
            f(txn);
        }
    }
}

pub fn txn(id: &str, date: &str, amount: &str, db_cr: DbCr) -> Transaction {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "txn_date": date,
        "amount": amount,
        "db_cr": db_cr.as_str(),
        "bank_code": "BCA",
        "description": format!("Transfer {}", id),
    }))
    .unwrap()
}

pub fn company(id: &str, name: &str) -> Company {
    Company {
        id: id.into(),
        name: name.into(),
        short_name: None,
        created_at: None,
    }
}

pub fn mark(id: &str, label: &str) -> Mark {
    Mark {
        id: id.into(),
        internal_report: None,
        personal_use: Some(label.into()),
        tax_report: None,
        is_asset: false,
        is_service: false,
        is_salary: false,
        is_tax: false,
        mappings: vec![],
    }
}

pub fn account(id: &str, code: &str, category: CoaCategory) -> ChartOfAccount {
    ChartOfAccount {
        id: id.into(),
        code: code.into(),
        name: format!("Account {}", code),
        category,
        subcategory: None,
        description: None,
        is_active: true,
        parent_id: None,
    }
}

#[async_trait]
impl TransactionGatewayTrait for MockBackend {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.transactions.lock().unwrap().clone();
        let delay = self.list_delays.lock().unwrap().get(call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record("list_transactions")?;
        Ok(snapshot)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Ack> {
        self.record("delete_transaction")?;
        self.transactions
            .lock()
            .unwrap()
            .retain(|t| t.id != transaction_id);
        Ok(Ack::default())
    }

    async fn bulk_delete(&self, transaction_ids: &[String]) -> Result<Ack> {
        self.record("bulk_delete")?;
        self.transactions
            .lock()
            .unwrap()
            .retain(|t| !transaction_ids.contains(&t.id));
        Ok(Ack::default())
    }

    async fn assign_mark(&self, transaction_id: &str, mark_id: Option<&str>) -> Result<Ack> {
        self.record("assign_mark")?;
        self.update_transactions(&[transaction_id.to_string()], |t| {
            t.mark_id = mark_id.map(str::to_string)
        });
        Ok(Ack::default())
    }

    async fn bulk_assign_mark(
        &self,
        transaction_ids: &[String],
        mark_id: Option<&str>,
    ) -> Result<Ack> {
        self.record("bulk_assign_mark")?;
        self.update_transactions(transaction_ids, |t| t.mark_id = mark_id.map(str::to_string));
        Ok(Ack::default())
    }

    async fn assign_company(
        &self,
        transaction_id: &str,
        company_id: Option<&str>,
    ) -> Result<Ack> {
        self.record("assign_company")?;
        self.update_transactions(&[transaction_id.to_string()], |t| {
            t.company_id = company_id.map(str::to_string)
        });
        Ok(Ack::default())
    }

    async fn bulk_assign_company(
        &self,
        transaction_ids: &[String],
        company_id: Option<&str>,
    ) -> Result<Ack> {
        self.record("bulk_assign_company")?;
        self.update_transactions(transaction_ids, |t| {
            t.company_id = company_id.map(str::to_string)
        });
        Ok(Ack::default())
    }

    async fn update_notes(&self, transaction_id: &str, notes: &str) -> Result<Ack> {
        self.record("update_notes")?;
        self.update_transactions(&[transaction_id.to_string()], |t| {
            t.notes = Some(notes.to_string())
        });
        Ok(Ack::default())
    }

    async fn upload_summary(&self) -> Result<Vec<UploadSummary>> {
        self.record("upload_summary")?;
        let transactions = self.transactions.lock().unwrap();
        let mut files: Vec<String> = transactions
            .iter()
            .filter_map(|t| t.source_file.clone())
            .collect();
        files.sort();
        files.dedup();
        Ok(files
            .into_iter()
            .map(|file| {
                let rows: Vec<&Transaction> = transactions
                    .iter()
                    .filter(|t| t.source_file.as_deref() == Some(file.as_str()))
                    .collect();
                UploadSummary {
                    source_file: Some(file),
                    transaction_count: rows.len() as u64,
                    start_date: None,
                    end_date: None,
                    bank_code: rows.first().map(|t| t.bank_code.clone()),
                    company_id: None,
                    company_name: None,
                    total_debit: rows
                        .iter()
                        .filter(|t| t.db_cr == DbCr::Debit)
                        .map(|t| t.amount)
                        .sum(),
                    total_credit: rows
                        .iter()
                        .filter(|t| t.db_cr == DbCr::Credit)
                        .map(|t| t.amount)
                        .sum(),
                    last_upload: None,
                }
            })
            .collect())
    }

    async fn delete_by_source(&self, request: &DeleteBySourceRequest) -> Result<Ack> {
        self.record("delete_by_source")?;
        self.transactions.lock().unwrap().retain(|t| {
            t.source_file.as_deref() != Some(request.source_file.as_str())
                || t.company_id != request.company_id
        });
        Ok(Ack::default())
    }

    async fn export_transactions(
        &self,
        request: &TransactionExportRequest,
    ) -> Result<BlobResponse> {
        self.record("export_transactions")?;
        self.exports.lock().unwrap().push(request.clone());
        Ok(BlobResponse {
            bytes: b"PK\x03\x04".to_vec(),
            content_disposition: None,
        })
    }
}

#[async_trait]
impl CompanyGatewayTrait for MockBackend {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        self.record("list_companies")?;
        Ok(self.companies.lock().unwrap().clone())
    }

    async fn create_company(&self, input: &CompanyInput) -> Result<Ack> {
        self.record("create_company")?;
        let mut companies = self.companies.lock().unwrap();
        let id = format!("c{}", companies.len() + 1);
        companies.push(company(&id, &input.name));
        Ok(Ack {
            id: Some(id),
            ..Default::default()
        })
    }

    async fn update_company(&self, _company_id: &str, _input: &CompanyInput) -> Result<Ack> {
        self.record("update_company")?;
        Ok(Ack::default())
    }

    async fn delete_company(&self, company_id: &str) -> Result<Ack> {
        self.record("delete_company")?;
        self.companies.lock().unwrap().retain(|c| c.id != company_id);
        Ok(Ack::default())
    }
}

#[async_trait]
impl MarkGatewayTrait for MockBackend {
    async fn list_marks(&self) -> Result<Vec<Mark>> {
        self.record("list_marks")?;
        Ok(self.marks.lock().unwrap().clone())
    }

    async fn create_mark(&self, input: &MarkInput) -> Result<Ack> {
        self.record("create_mark")?;
        let mut marks = self.marks.lock().unwrap();
        let id = format!("m{}", marks.len() + 1);
        marks.push(mark(&id, &input.personal_use));
        Ok(Ack {
            id: Some(id),
            ..Default::default()
        })
    }

    async fn update_mark(&self, mark_id: &str, input: &MarkInput) -> Result<Ack> {
        self.record("update_mark")?;
        let mut marks = self.marks.lock().unwrap();
        if let Some(found) = marks.iter_mut().find(|m| m.id == mark_id) {
            found.personal_use = Some(input.personal_use.clone());
        }
        Ok(Ack::default())
    }

    async fn delete_mark(&self, mark_id: &str) -> Result<Ack> {
        self.record("delete_mark")?;
        self.marks.lock().unwrap().retain(|m| m.id != mark_id);
        let ids: Vec<String> = self.transaction_ids();
        self.update_transactions(&ids, |t| {
            if t.mark_id.as_deref() == Some(mark_id) {
                t.mark_id = None;
            }
        });
        Ok(Ack::default())
    }
}

#[async_trait]
impl CoaGatewayTrait for MockBackend {
    async fn list_coa(&self) -> Result<Vec<ChartOfAccount>> {
        self.record("list_coa")?;
        Ok(self.coa.lock().unwrap().clone())
    }

    async fn create_coa(&self, _input: &CoaInput) -> Result<Ack> {
        self.record("create_coa")?;
        Ok(Ack::default())
    }

    async fn update_coa(&self, _coa_id: &str, _input: &CoaInput) -> Result<Ack> {
        self.record("update_coa")?;
        Ok(Ack::default())
    }

    async fn delete_coa(&self, _coa_id: &str) -> Result<Ack> {
        self.record("delete_coa")?;
        Ok(Ack::default())
    }

    async fn list_mark_mappings(&self, _mark_id: &str) -> Result<Vec<MarkCoaMapping>> {
        self.record("list_mark_mappings")?;
        Ok(vec![])
    }

    async fn create_mark_mapping(
        &self,
        _mark_id: &str,
        _mapping: &NewMarkCoaMapping,
    ) -> Result<Ack> {
        self.record("create_mark_mapping")?;
        Ok(Ack::default())
    }

    async fn delete_mark_mapping(&self, _mapping_id: &str) -> Result<Ack> {
        self.record("delete_mark_mapping")?;
        Ok(Ack::default())
    }
}

#[async_trait]
impl FilterGatewayTrait for MockBackend {
    async fn load_filters(&self, view_name: &str) -> Result<Value> {
        self.record("load_filters")?;
        Ok(self
            .filters
            .lock()
            .unwrap()
            .get(view_name)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({})))
    }

    async fn save_filters(&self, view_name: &str, filters: &Value) -> Result<Ack> {
        self.filter_saves.fetch_add(1, Ordering::SeqCst);
        self.record("save_filters")?;
        self.filters
            .lock()
            .unwrap()
            .insert(view_name.to_string(), filters.clone());
        Ok(Ack::default())
    }
}

/// Amortization gateway whose calls can be switched offline.
#[derive(Default)]
pub struct MockAmortizationGateway {
    pub groups: Mutex<Vec<AssetGroup>>,
    pub assets: Mutex<Vec<Asset>>,
    pub calculations: Mutex<Vec<AmortizationCalculation>>,
    pub calls: Mutex<Vec<String>>,
    pub offline: Mutex<bool>,
}

impl MockAmortizationGateway {
    fn record(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if *self.offline.lock().unwrap() {
            return Err(Error::Network("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AmortizationGatewayTrait for MockAmortizationGateway {
    async fn list_asset_groups(
        &self,
        _company_id: Option<&str>,
        asset_type: Option<&AssetType>,
    ) -> Result<Vec<AssetGroup>> {
        self.record("list_asset_groups")?;
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .filter(|g| asset_type.map_or(true, |t| &g.asset_type == t))
            .cloned()
            .collect())
    }

    async fn create_asset_group(&self, _input: &AssetGroupInput) -> Result<Ack> {
        self.record("create_asset_group")?;
        Ok(Ack::default())
    }

    async fn update_asset_group(&self, _group_id: &str, _input: &AssetGroupInput) -> Result<Ack> {
        self.record("update_asset_group")?;
        Ok(Ack::default())
    }

    async fn list_assets(&self, _company_id: &str) -> Result<Vec<Asset>> {
        self.record("list_assets")?;
        Ok(self.assets.lock().unwrap().clone())
    }

    async fn create_asset(&self, _input: &AssetInput) -> Result<Ack> {
        self.record("create_asset")?;
        Ok(Ack::default())
    }

    async fn update_asset(&self, _asset_id: &str, _input: &AssetInput) -> Result<Ack> {
        self.record("update_asset")?;
        Ok(Ack::default())
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<Ack> {
        self.record("delete_asset")?;
        self.assets.lock().unwrap().retain(|a| a.id != asset_id);
        Ok(Ack::default())
    }

    async fn calculate(&self, _period: &AmortizationPeriod) -> Result<Vec<AmortizationCalculation>> {
        self.record("calculate")?;
        Ok(self.calculations.lock().unwrap().clone())
    }

    async fn summary(&self, period: &AmortizationPeriod) -> Result<ReportPayload> {
        self.record("summary")?;
        Ok(json!({"year": period.year}))
    }

    async fn get_settings(&self, _company_id: Option<&str>) -> Result<Map<String, Value>> {
        self.record("get_settings")?;
        let mut settings = Map::new();
        settings.insert("allow_partial_year".into(), json!(true));
        Ok(settings)
    }

    async fn save_settings(&self, _settings: &Map<String, Value>) -> Result<Ack> {
        self.record("save_settings")?;
        Ok(Ack::default())
    }

    async fn coa_codes(&self, _company_id: Option<&str>) -> Result<AmortizationCoaCodes> {
        self.record("coa_codes")?;
        Ok(AmortizationCoaCodes {
            coa_codes: vec!["5314".into(), "5315".into()],
            coa_details: vec![],
        })
    }

    async fn mark_settings(&self, _company_id: Option<&str>) -> Result<MarkSettings> {
        self.record("mark_settings")?;
        Ok(MarkSettings::default())
    }

    async fn save_mark_settings(
        &self,
        _company_id: Option<&str>,
        _settings: &MarkAmortizationSettings,
    ) -> Result<Ack> {
        self.record("save_mark_settings")?;
        Ok(Ack::default())
    }

    async fn create_mark_mapping(&self, _mapping: &MarkAmortizationMapping) -> Result<Ack> {
        self.record("create_mark_mapping")?;
        Ok(Ack::default())
    }

    async fn update_mark_is_asset(&self, _mark_id: &str, _is_asset: bool) -> Result<Ack> {
        self.record("update_mark_is_asset")?;
        Ok(Ack::default())
    }

    async fn eligible_marks(&self, _company_id: &str) -> Result<Vec<EligibleMark>> {
        self.record("eligible_marks")?;
        Ok(vec![EligibleMark {
            id: "m1".into(),
            personal_use: Some("pembelian bangunan".into()),
            asset_type: AssetType::Building,
        }])
    }

    async fn list_items(&self, _company_id: &str, _year: i32) -> Result<AmortizationItems> {
        self.record("list_items")?;
        Ok(AmortizationItems::default())
    }

    async fn create_item(&self, _input: &AmortizationItemInput) -> Result<Ack> {
        self.record("create_item")?;
        Ok(Ack {
            id: Some("i1".into()),
            ..Default::default()
        })
    }

    async fn update_item(&self, _item_id: &str, _input: &AmortizationItemInput) -> Result<Ack> {
        self.record("update_item")?;
        Ok(Ack::default())
    }

    async fn delete_item(&self, _item_id: &str) -> Result<Ack> {
        self.record("delete_item")?;
        Ok(Ack::default())
    }

    async fn generate_journal(&self, _period: &AmortizationPeriod) -> Result<JournalGeneration> {
        self.record("generate_journal")?;
        Ok(JournalGeneration {
            message: Some("Successfully generated 2 journal entries".into()),
            journal_count: 2,
            items_processed: 2,
        })
    }
}
