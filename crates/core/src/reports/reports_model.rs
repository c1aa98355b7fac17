//! Report domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::exports::ExportFormat;
use crate::utils::serde_formats::{
    amount, null_as_default, option_string_or_number, string_or_number,
};
use crate::utils::time_utils::current_year;

/// Saved state of the reports page.
///
/// Keys are camelCase on the wire. Absent dates mean "not chosen".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFilters {
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(deserialize_with = "option_string_or_number")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "option_string_or_number")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "option_string_or_number")]
    pub as_of_date: Option<String>,
    #[serde(deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
}

impl Default for ReportFilters {
    fn default() -> Self {
        Self {
            year: current_year().to_string(),
            start_date: None,
            end_date: None,
            as_of_date: None,
            company_id: None,
        }
    }
}

impl ReportFilters {
    pub fn period(&self) -> ReportPeriod {
        ReportPeriod {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            company_id: self.company_id.clone(),
        }
    }

    /// Overlays the keys present in `saved` onto `self`.
    ///
    /// Keys missing from `saved` keep their current value; unreadable values
    /// leave `self` unchanged.
    pub fn merged_with(&self, saved: &Value) -> Option<Self> {
        let Value::Object(saved) = saved else {
            return None;
        };
        let Ok(Value::Object(mut current)) = serde_json::to_value(self) else {
            return None;
        };
        for (key, value) in saved {
            current.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(current)).ok()
    }
}

/// Date range and company a report is computed for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub company_id: Option<String>,
}

/// Profit and loss for a period.
///
/// The totals are modelled; the line-item breakdown stays as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    #[serde(default, with = "amount")]
    pub total_revenue: Decimal,
    #[serde(default, with = "amount")]
    pub total_expenses: Decimal,
    #[serde(default, with = "amount")]
    pub net_income: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expenses: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenuePoint {
    pub month: u32,
    #[serde(default, with = "amount")]
    pub revenue: Decimal,
}

/// Revenue per month for a year and the year before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<MonthlyRevenuePoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prev_year_data: Vec<MonthlyRevenuePoint>,
}

/// Body of `POST /reports/export`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportExportRequest {
    pub report_type: String,
    pub format: ExportFormat,
    pub filters: Value,
}

/// Parses the year list the backend returns, newest first.
///
/// Entries may be numbers or numeric strings; anything else is dropped.
pub fn normalize_years(years: &[Value]) -> Vec<i32> {
    let mut parsed: Vec<i32> = years
        .iter()
        .filter_map(|year| match year {
            Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect();
    parsed.sort_unstable_by(|a, b| b.cmp(a));
    parsed.dedup();
    parsed
}
