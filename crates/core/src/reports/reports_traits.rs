use async_trait::async_trait;
use serde_json::{Map, Value};

use super::reports_model::{IncomeStatement, MonthlyRevenue, ReportExportRequest, ReportPeriod};
use crate::errors::Result;
use crate::shared::{Ack, BlobResponse, ReportPayload};

/// Remote calls for `/reports`.
#[async_trait]
pub trait ReportGatewayTrait: Send + Sync {
    async fn income_statement(&self, period: &ReportPeriod) -> Result<IncomeStatement>;
    async fn balance_sheet(
        &self,
        as_of_date: Option<&str>,
        company_id: Option<&str>,
    ) -> Result<ReportPayload>;
    async fn cash_flow(&self, period: &ReportPeriod) -> Result<ReportPayload>;
    async fn payroll_salary_summary(&self, period: &ReportPeriod) -> Result<ReportPayload>;
    async fn coa_detail(&self, coa_id: &str, period: &ReportPeriod) -> Result<ReportPayload>;
    async fn monthly_revenue(&self, year: i32, company_id: Option<&str>) -> Result<MonthlyRevenue>;
    /// Raw `years` array; entries may be numbers or strings.
    async fn available_years(&self, company_id: Option<&str>) -> Result<Vec<Value>>;

    async fn inventory_balances(
        &self,
        year: i32,
        company_id: Option<&str>,
    ) -> Result<Map<String, Value>>;
    async fn save_inventory_balances(&self, balances: &Value) -> Result<Ack>;

    async fn export_report(&self, request: &ReportExportRequest) -> Result<BlobResponse>;
}
