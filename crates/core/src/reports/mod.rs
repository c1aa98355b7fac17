//! Reports module - financial statements, monthly revenue and report exports.

mod reports_model;
mod reports_store;
mod reports_traits;


pub use reports_model::{
    normalize_years, IncomeStatement, MonthlyRevenue, MonthlyRevenuePoint, ReportExportRequest,
    ReportFilters, ReportPeriod,
};
pub use reports_store::ReportsStore;
pub use reports_traits::ReportGatewayTrait;
