use async_trait::async_trait;
use serde_json::{Map, Value};

use ledgerdesk_core::errors::Result;
use ledgerdesk_core::reports::{
    IncomeStatement, MonthlyRevenue, ReportExportRequest, ReportGatewayTrait, ReportPeriod,
};
use ledgerdesk_core::shared::{Ack, BlobResponse, ReportPayload};

use crate::client::{opt, ApiClient};

fn period_query(period: &ReportPeriod) -> [(&'static str, Option<String>); 3] {
    [
        ("start_date", opt(period.start_date.as_deref())),
        ("end_date", opt(period.end_date.as_deref())),
        ("company_id", opt(period.company_id.as_deref())),
    ]
}

#[async_trait]
impl ReportGatewayTrait for ApiClient {
    async fn income_statement(&self, period: &ReportPeriod) -> Result<IncomeStatement> {
        self.get("/reports/income-statement", &period_query(period))
            .await
    }

    async fn balance_sheet(
        &self,
        as_of_date: Option<&str>,
        company_id: Option<&str>,
    ) -> Result<ReportPayload> {
        self.get(
            "/reports/balance-sheet",
            &[
                ("as_of_date", opt(as_of_date)),
                ("company_id", opt(company_id)),
            ],
        )
        .await
    }

    async fn cash_flow(&self, period: &ReportPeriod) -> Result<ReportPayload> {
        self.get("/reports/cash-flow", &period_query(period)).await
    }

    async fn payroll_salary_summary(&self, period: &ReportPeriod) -> Result<ReportPayload> {
        self.get("/reports/payroll-salary-summary", &period_query(period))
            .await
    }

    async fn coa_detail(&self, coa_id: &str, period: &ReportPeriod) -> Result<ReportPayload> {
        let [start, end, company] = period_query(period);
        self.get(
            "/reports/coa-detail",
            &[("coa_id", Some(coa_id.to_string())), start, end, company],
        )
        .await
    }

    async fn monthly_revenue(&self, year: i32, company_id: Option<&str>) -> Result<MonthlyRevenue> {
        self.get(
            "/reports/monthly-revenue",
            &[
                ("year", Some(year.to_string())),
                ("company_id", opt(company_id)),
            ],
        )
        .await
    }

    async fn available_years(&self, company_id: Option<&str>) -> Result<Vec<Value>> {
        self.get_field(
            "/reports/available-years",
            &[("company_id", opt(company_id))],
            "years",
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inventory balances
    // ─────────────────────────────────────────────────────────────────────────

    async fn inventory_balances(
        &self,
        year: i32,
        company_id: Option<&str>,
    ) -> Result<Map<String, Value>> {
        self.get_field(
            "/reports/inventory-balances",
            &[
                ("year", Some(year.to_string())),
                ("company_id", opt(company_id)),
            ],
            "balance",
        )
        .await
    }

    async fn save_inventory_balances(&self, balances: &Value) -> Result<Ack> {
        self.post("/reports/inventory-balances", balances).await
    }

    async fn export_report(&self, request: &ReportExportRequest) -> Result<BlobResponse> {
        self.post_for_blob("/reports/export", request).await
    }
}
