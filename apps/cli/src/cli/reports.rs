use std::path::PathBuf;

use comfy_table::{Cell, Table};
use ledgerdesk_core::exports::ExportFormat;
use ledgerdesk_core::reports::{MonthlyRevenuePoint, ReportPeriod};
use ledgerdesk_core::Session;
use rust_decimal::Decimal;
use serde_json::json;

use super::PeriodArgs;
use crate::fmt::{money, payload};

impl PeriodArgs {
    fn to_period(&self) -> ReportPeriod {
        ReportPeriod {
            start_date: self.from.clone(),
            end_date: self.to.clone(),
            company_id: self.company.clone(),
        }
    }
}

pub async fn income(session: &Session, period: &PeriodArgs) -> anyhow::Result<()> {
    let statement = session
        .reports()
        .fetch_income_statement(period.to_period())
        .await?;
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![Cell::new("Revenue"), Cell::new(money(statement.total_revenue))]);
    table.add_row(vec![Cell::new("Expenses"), Cell::new(money(statement.total_expenses))]);
    table.add_row(vec![Cell::new("Net income"), Cell::new(money(statement.net_income))]);
    println!("{table}");
    Ok(())
}

pub async fn balance(
    session: &Session,
    as_of: Option<&str>,
    company: Option<&str>,
) -> anyhow::Result<()> {
    let report = session.reports().fetch_balance_sheet(as_of, company).await?;
    println!("{}", payload(&report));
    Ok(())
}

pub async fn cash_flow(session: &Session, period: &PeriodArgs) -> anyhow::Result<()> {
    let report = session.reports().fetch_cash_flow(&period.to_period()).await?;
    println!("{}", payload(&report));
    Ok(())
}

pub async fn payroll(session: &Session, period: &PeriodArgs) -> anyhow::Result<()> {
    let report = session
        .reports()
        .fetch_payroll_salary_summary(&period.to_period())
        .await?;
    println!("{}", payload(&report));
    Ok(())
}

fn revenue_for(points: &[MonthlyRevenuePoint], month: u32) -> Decimal {
    points
        .iter()
        .filter(|p| p.month == month)
        .map(|p| p.revenue)
        .sum()
}

pub async fn revenue(session: &Session, year: &str, company: Option<&str>) -> anyhow::Result<()> {
    let revenue = session.reports().fetch_monthly_revenue(year, company).await?;
    let mut table = Table::new();
    table.set_header(vec!["Month", "Revenue", "Previous year"]);
    for month in 1..=12 {
        table.add_row(vec![
            Cell::new(month),
            Cell::new(money(revenue_for(&revenue.data, month))),
            Cell::new(money(revenue_for(&revenue.prev_year_data, month))),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn years(session: &Session, company: Option<&str>) -> anyhow::Result<()> {
    for year in session.reports().fetch_available_years(company).await {
        println!("{year}");
    }
    Ok(())
}

/// Fetches the core reports for the saved report filters. Reports that
/// failed are listed; the rest are printed.
pub async fn all(session: &Session) -> anyhow::Result<()> {
    let reports = session.reports();
    reports.load_filters().await;
    let complete = reports.fetch_all_reports().await;

    let mut table = Table::new();
    table.set_header(vec!["Report", "Status"]);
    let loaded = |present: bool| if present { "loaded" } else { "failed" };
    table.add_row(vec!["Income statement", loaded(reports.has_income_statement())]);
    table.add_row(vec!["Balance sheet", loaded(reports.balance_sheet().is_some())]);
    table.add_row(vec!["Monthly revenue", loaded(reports.monthly_revenue().is_some())]);
    table.add_row(vec!["Cash flow", loaded(reports.cash_flow().is_some())]);
    table.add_row(vec!["Payroll", loaded(reports.payroll_salary_summary().is_some())]);
    println!("{table}");

    if reports.has_income_statement() {
        println!(
            "Revenue {}  Expenses {}  Net {}",
            money(reports.total_revenue()),
            money(reports.total_expenses()),
            money(reports.net_income())
        );
    }
    if !complete {
        let message = reports.status().error.unwrap_or_default();
        anyhow::bail!("Some reports failed: {}", message);
    }
    Ok(())
}

pub async fn export(
    session: &Session,
    report_type: &str,
    period: &PeriodArgs,
    format: ExportFormat,
    out: PathBuf,
) -> anyhow::Result<()> {
    let filters = json!({
        "start_date": period.from,
        "end_date": period.to,
        "company_id": period.company,
    });
    let file = session
        .reports()
        .export_report(report_type, format, filters)
        .await?;
    let path = file.save_to(&out).await?;
    println!("Wrote {}", path.display());
    Ok(())
}
