use log::{debug, warn};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::reports_model::{
    normalize_years, IncomeStatement, MonthlyRevenue, MonthlyRevenuePoint, ReportExportRequest,
    ReportFilters, ReportPeriod,
};
use super::reports_traits::ReportGatewayTrait;
use crate::amortization::{AmortizationCoaCodes, AmortizationGatewayTrait, AmortizationItems};
use crate::constants::{MONTHLY_REVENUE_VIEW, REPORTS_VIEW};
use crate::errors::Result;
use crate::exports::{ExportFormat, ExportedFile};
use crate::filters::{FilterGatewayTrait, FilterPersistence};
use crate::shared::{Ack, ReportPayload};
use crate::state::{or_default, read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};
use crate::utils::time_utils::{current_year, today};

#[derive(Default)]
struct ReportsState {
    filters: ReportFilters,
    income_statement: Option<IncomeStatement>,
    balance_sheet: Option<ReportPayload>,
    cash_flow: Option<ReportPayload>,
    payroll_salary_summary: Option<ReportPayload>,
    coa_detail: Option<ReportPayload>,
    monthly_revenue: Option<Vec<MonthlyRevenuePoint>>,
    monthly_revenue_prev_year: Option<Vec<MonthlyRevenuePoint>>,
    available_years: Vec<i32>,
}

/// One token source per report slot; a slot only takes the response of its
/// latest request.
#[derive(Default)]
struct ReportRequests {
    income_statement: RequestSequence,
    balance_sheet: RequestSequence,
    cash_flow: RequestSequence,
    payroll_salary_summary: RequestSequence,
    coa_detail: RequestSequence,
    monthly_revenue: RequestSequence,
    available_years: RequestSequence,
}

/// State behind the financial reports pages.
pub struct ReportsStore {
    gateway: Arc<dyn ReportGatewayTrait>,
    amortization: Arc<dyn AmortizationGatewayTrait>,
    saved_filters: FilterPersistence<ReportFilters>,
    monthly_revenue_filters: FilterPersistence<Value>,
    state: RwLock<ReportsState>,
    status: StatusCell,
    requests: ReportRequests,
    mutations: Mutex<()>,
}

impl ReportsStore {
    pub fn new(
        gateway: Arc<dyn ReportGatewayTrait>,
        amortization: Arc<dyn AmortizationGatewayTrait>,
        filters: Arc<dyn FilterGatewayTrait>,
    ) -> Self {
        Self {
            gateway,
            amortization,
            saved_filters: FilterPersistence::new(filters.clone(), REPORTS_VIEW),
            monthly_revenue_filters: FilterPersistence::new(filters, MONTHLY_REVENUE_VIEW),
            state: RwLock::new(ReportsState::default()),
            status: StatusCell::default(),
            requests: ReportRequests::default(),
            mutations: Mutex::new(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshots
    // ─────────────────────────────────────────────────────────────────────────

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn filters(&self) -> ReportFilters {
        read_lock(&self.state).filters.clone()
    }

    pub fn income_statement(&self) -> Option<IncomeStatement> {
        read_lock(&self.state).income_statement.clone()
    }

    pub fn balance_sheet(&self) -> Option<ReportPayload> {
        read_lock(&self.state).balance_sheet.clone()
    }

    pub fn cash_flow(&self) -> Option<ReportPayload> {
        read_lock(&self.state).cash_flow.clone()
    }

    pub fn payroll_salary_summary(&self) -> Option<ReportPayload> {
        read_lock(&self.state).payroll_salary_summary.clone()
    }

    pub fn coa_detail(&self) -> Option<ReportPayload> {
        read_lock(&self.state).coa_detail.clone()
    }

    pub fn monthly_revenue(&self) -> Option<Vec<MonthlyRevenuePoint>> {
        read_lock(&self.state).monthly_revenue.clone()
    }

    pub fn monthly_revenue_prev_year(&self) -> Option<Vec<MonthlyRevenuePoint>> {
        read_lock(&self.state).monthly_revenue_prev_year.clone()
    }

    pub fn available_years(&self) -> Vec<i32> {
        read_lock(&self.state).available_years.clone()
    }

    fn income_total(&self, pick: fn(&IncomeStatement) -> Decimal) -> Decimal {
        read_lock(&self.state)
            .income_statement
            .as_ref()
            .map(pick)
            .unwrap_or_default()
    }

    pub fn total_revenue(&self) -> Decimal {
        self.income_total(|s| s.total_revenue)
    }

    pub fn total_expenses(&self) -> Decimal {
        self.income_total(|s| s.total_expenses)
    }

    pub fn net_income(&self) -> Decimal {
        self.income_total(|s| s.net_income)
    }

    pub fn has_income_statement(&self) -> bool {
        read_lock(&self.state).income_statement.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filters
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies `f` to the filters and saves them.
    pub async fn set_filters(&self, f: impl FnOnce(&mut ReportFilters) + Send) {
        let filters = {
            let mut state = write_lock(&self.state);
            f(&mut state.filters);
            state.filters.clone()
        };
        self.saved_filters.save(&filters).await;
    }

    /// Overlays the saved filters onto the current ones.
    pub async fn load_filters(&self) {
        let saved = self.saved_filters.load_raw().await;
        if saved.as_object().map_or(true, |m| m.is_empty()) {
            return;
        }
        let mut state = write_lock(&self.state);
        match state.filters.merged_with(&saved) {
            Some(merged) => state.filters = merged,
            None => warn!("Ignoring unreadable {} filters", REPORTS_VIEW),
        }
    }

    /// Filters of the monthly revenue view; `{}` when none are stored.
    pub async fn load_monthly_revenue_filters(&self) -> Value {
        self.monthly_revenue_filters.load_raw().await
    }

    pub async fn save_monthly_revenue_filters(&self, filters: &Value) {
        self.monthly_revenue_filters.save(filters).await;
    }

    /// Years with data, newest first. Falls back to the current year.
    pub async fn fetch_available_years(&self, company_id: Option<&str>) -> Vec<i32> {
        let token = self.requests.available_years.issue();
        let raw = or_default(
            self.gateway.available_years(company_id).await,
            Vec::new(),
            "Failed to fetch available report years",
        );
        let mut years = normalize_years(&raw);
        if years.is_empty() {
            years.push(current_year());
        }
        if self.requests.available_years.is_latest(token) {
            write_lock(&self.state).available_years = years.clone();
        }
        years
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetches the income statement and remembers the period in the filters.
    pub async fn fetch_income_statement(&self, period: ReportPeriod) -> Result<IncomeStatement> {
        self.status.clear_error();
        self.load_income_statement(period).await
    }

    pub async fn fetch_balance_sheet(
        &self,
        as_of_date: Option<&str>,
        company_id: Option<&str>,
    ) -> Result<ReportPayload> {
        self.status.clear_error();
        self.load_balance_sheet(as_of_date, company_id).await
    }

    pub async fn fetch_cash_flow(&self, period: &ReportPeriod) -> Result<ReportPayload> {
        self.status.clear_error();
        self.load_cash_flow(period).await
    }

    pub async fn fetch_payroll_salary_summary(&self, period: &ReportPeriod) -> Result<ReportPayload> {
        self.status.clear_error();
        self.load_payroll_salary_summary(period).await
    }

    pub async fn fetch_coa_detail(&self, coa_id: &str, period: &ReportPeriod) -> Result<ReportPayload> {
        let _loading = self.status.begin();
        self.status.clear_error();
        let slot = &self.requests.coa_detail;
        let token = slot.issue();
        let result = self.gateway.coa_detail(coa_id, period).await;
        let report = self.settle(slot, token, result, "Failed to fetch COA detail")?;
        if slot.is_latest(token) {
            write_lock(&self.state).coa_detail = Some(report.clone());
        }
        Ok(report)
    }

    /// Monthly revenue for `year` and the year before.
    ///
    /// A year that is not a number yields an empty result without a request.
    pub async fn fetch_monthly_revenue(
        &self,
        year: &str,
        company_id: Option<&str>,
    ) -> Result<MonthlyRevenue> {
        self.status.clear_error();
        self.load_monthly_revenue(year, company_id).await
    }

    /// Fetches the five core reports for the current filters concurrently.
    ///
    /// The reports are committed together, and only when all five arrived.
    /// Returns `false` when any of them failed; the failure is recorded in the
    /// error slot and the previously shown reports stay as they were.
    pub async fn fetch_all_reports(&self) -> bool {
        let _loading = self.status.begin();
        self.status.clear_error();
        let filters = self.filters();
        let period = filters.period();
        let company_id = filters.company_id.as_deref();
        let year = parse_year(&filters.year);

        let requests = &self.requests;
        let income_token = requests.income_statement.issue();
        let balance_token = requests.balance_sheet.issue();
        let monthly_token = year.map(|_| requests.monthly_revenue.issue());
        let cash_flow_token = requests.cash_flow.issue();
        let payroll_token = requests.payroll_salary_summary.issue();

        let monthly_request = async {
            match year {
                Some(year) => self.gateway.monthly_revenue(year, company_id).await.map(Some),
                None => Ok(None),
            }
        };
        let (income, balance, monthly, cash_flow, payroll) = tokio::join!(
            self.gateway.income_statement(&period),
            self.gateway.balance_sheet(filters.as_of_date.as_deref(), company_id),
            monthly_request,
            self.gateway.cash_flow(&period),
            self.gateway.payroll_salary_summary(&period),
        );

        let income = self.settle(
            &requests.income_statement,
            income_token,
            income,
            "Failed to fetch income statement",
        );
        let balance = self.settle(
            &requests.balance_sheet,
            balance_token,
            balance,
            "Failed to fetch balance sheet",
        );
        let monthly = match monthly_token {
            Some(token) => self.settle(
                &requests.monthly_revenue,
                token,
                monthly,
                "Failed to fetch monthly revenue",
            ),
            None => Ok(None),
        };
        let cash_flow = self.settle(
            &requests.cash_flow,
            cash_flow_token,
            cash_flow,
            "Failed to fetch cash flow",
        );
        let payroll = self.settle(
            &requests.payroll_salary_summary,
            payroll_token,
            payroll,
            "Failed to fetch payroll salary summary",
        );

        let (Ok(income), Ok(balance), Ok(monthly), Ok(cash_flow), Ok(payroll)) =
            (income, balance, monthly, cash_flow, payroll)
        else {
            warn!("Not every report could be fetched; keeping the previous reports");
            return false;
        };

        let mut state = write_lock(&self.state);
        if requests.income_statement.is_latest(income_token) {
            apply_income_statement(&mut state, income, period);
        }
        if requests.balance_sheet.is_latest(balance_token) {
            state.balance_sheet = Some(balance);
        }
        if let (Some(token), Some(revenue)) = (monthly_token, monthly) {
            if requests.monthly_revenue.is_latest(token) {
                apply_monthly_revenue(&mut state, &revenue);
            }
        }
        if requests.cash_flow.is_latest(cash_flow_token) {
            state.cash_flow = Some(cash_flow);
        }
        if requests.payroll_salary_summary.is_latest(payroll_token) {
            state.payroll_salary_summary = Some(payroll);
        }
        true
    }

    /// Records a failure only when it belongs to the latest request of its
    /// slot. Loaders never clear the error slot.
    fn settle<T>(
        &self,
        slot: &RequestSequence,
        token: u64,
        result: Result<T>,
        fallback: &str,
    ) -> Result<T> {
        result.map_err(|e| {
            if slot.is_latest(token) {
                self.status.fail(e, fallback)
            } else {
                e
            }
        })
    }

    async fn load_income_statement(&self, period: ReportPeriod) -> Result<IncomeStatement> {
        let _loading = self.status.begin();
        let slot = &self.requests.income_statement;
        let token = slot.issue();
        let result = self.gateway.income_statement(&period).await;
        let statement = self.settle(slot, token, result, "Failed to fetch income statement")?;
        if slot.is_latest(token) {
            apply_income_statement(&mut write_lock(&self.state), statement.clone(), period);
        }
        Ok(statement)
    }

    async fn load_balance_sheet(
        &self,
        as_of_date: Option<&str>,
        company_id: Option<&str>,
    ) -> Result<ReportPayload> {
        let _loading = self.status.begin();
        let slot = &self.requests.balance_sheet;
        let token = slot.issue();
        let result = self.gateway.balance_sheet(as_of_date, company_id).await;
        let sheet = self.settle(slot, token, result, "Failed to fetch balance sheet")?;
        if slot.is_latest(token) {
            write_lock(&self.state).balance_sheet = Some(sheet.clone());
        }
        Ok(sheet)
    }

    async fn load_cash_flow(&self, period: &ReportPeriod) -> Result<ReportPayload> {
        let _loading = self.status.begin();
        let slot = &self.requests.cash_flow;
        let token = slot.issue();
        let result = self.gateway.cash_flow(period).await;
        let report = self.settle(slot, token, result, "Failed to fetch cash flow")?;
        if slot.is_latest(token) {
            write_lock(&self.state).cash_flow = Some(report.clone());
        }
        Ok(report)
    }

    async fn load_payroll_salary_summary(&self, period: &ReportPeriod) -> Result<ReportPayload> {
        let _loading = self.status.begin();
        let slot = &self.requests.payroll_salary_summary;
        let token = slot.issue();
        let result = self.gateway.payroll_salary_summary(period).await;
        let report = self.settle(slot, token, result, "Failed to fetch payroll salary summary")?;
        if slot.is_latest(token) {
            write_lock(&self.state).payroll_salary_summary = Some(report.clone());
        }
        Ok(report)
    }

    async fn load_monthly_revenue(
        &self,
        year: &str,
        company_id: Option<&str>,
    ) -> Result<MonthlyRevenue> {
        let Some(parsed) = parse_year(year) else {
            return Ok(MonthlyRevenue::default());
        };
        let _loading = self.status.begin();
        let slot = &self.requests.monthly_revenue;
        let token = slot.issue();
        let result = self.gateway.monthly_revenue(parsed, company_id).await;
        let revenue = self.settle(slot, token, result, "Failed to fetch monthly revenue")?;
        if slot.is_latest(token) {
            apply_monthly_revenue(&mut write_lock(&self.state), &revenue);
        }
        Ok(revenue)
    }

    /// Exports one report in the requested format.
    pub async fn export_report(
        &self,
        report_type: &str,
        format: ExportFormat,
        filters: Value,
    ) -> Result<ExportedFile> {
        let _loading = self.status.begin();
        self.status.clear_error();
        let request = ReportExportRequest {
            report_type: report_type.to_string(),
            format,
            filters,
        };
        let blob = self
            .gateway
            .export_report(&request)
            .await
            .map_err(|e| self.status.fail(e, "Failed to export report"))?;
        let file = ExportedFile::from_blob("report", format, blob, today());
        debug!("Exported {} ({} bytes)", file.file_name, file.bytes.len());
        Ok(file)
    }

    /// Drops the period reports and the error. Balance sheet and monthly
    /// revenue are kept.
    pub fn clear_reports(&self) {
        {
            let mut state = write_lock(&self.state);
            state.income_statement = None;
            state.cash_flow = None;
            state.payroll_salary_summary = None;
            state.coa_detail = None;
        }
        self.status.clear_error();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inventory and amortization inputs
    // ─────────────────────────────────────────────────────────────────────────

    /// Opening and closing inventory for a year; `{}` when unavailable.
    pub async fn fetch_inventory_balances(
        &self,
        year: i32,
        company_id: Option<&str>,
    ) -> Map<String, Value> {
        or_default(
            self.gateway.inventory_balances(year, company_id).await,
            Map::new(),
            "Failed to fetch inventory balances",
        )
    }

    pub async fn save_inventory_balances(&self, balances: &Value) -> Result<Ack> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.gateway
            .save_inventory_balances(balances)
            .await
            .map_err(|e| self.status.fail(e, "Failed to save inventory balances"))
    }

    /// Amortization schedule; empty when unavailable.
    pub async fn fetch_amortization_items(&self, year: i32, company_id: &str) -> AmortizationItems {
        or_default(
            self.amortization.list_items(company_id, year).await,
            AmortizationItems::default(),
            "Failed to fetch amortization items",
        )
    }

    pub async fn fetch_amortization_settings(&self, company_id: Option<&str>) -> Map<String, Value> {
        or_default(
            self.amortization.get_settings(company_id).await,
            Map::new(),
            "Failed to fetch amortization settings",
        )
    }

    pub async fn save_amortization_settings(&self, settings: &Map<String, Value>) -> Result<Ack> {
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.amortization
            .save_settings(settings)
            .await
            .map_err(|e| self.status.fail(e, "Failed to save amortization settings"))
    }

    pub async fn fetch_amortization_coa_codes(&self, company_id: Option<&str>) -> AmortizationCoaCodes {
        or_default(
            self.amortization.coa_codes(company_id).await,
            AmortizationCoaCodes::default(),
            "Failed to fetch amortization COA codes",
        )
    }
}

fn parse_year(year: &str) -> Option<i32> {
    let parsed = year.trim().parse::<i32>().ok();
    if parsed.is_none() {
        warn!("Invalid monthly revenue year: {:?}", year);
    }
    parsed
}

/// Stores the statement and remembers its period in the filters.
fn apply_income_statement(state: &mut ReportsState, statement: IncomeStatement, period: ReportPeriod) {
    state.income_statement = Some(statement);
    state.filters.start_date = period.start_date;
    state.filters.end_date = period.end_date;
    state.filters.company_id = period.company_id;
}

fn apply_monthly_revenue(state: &mut ReportsState, revenue: &MonthlyRevenue) {
    state.monthly_revenue = Some(revenue.data.clone());
    state.monthly_revenue_prev_year = Some(revenue.prev_year_data.clone());
}
