//! Transaction domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::exports::ExportFormat;
use crate::transactions::filters_model::TransactionFilters;
use crate::utils::serde_formats::{
    amount, bool_flag, null_as_default, option_string_or_number, string_or_number,
};
use crate::utils::time_utils::{date_only, year_of};

/// Debit/credit direction of a bank mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DbCr {
    #[serde(rename = "DB", alias = "DEBIT", alias = "db")]
    Debit,
    #[serde(rename = "CR", alias = "CREDIT", alias = "cr")]
    Credit,
}

impl DbCr {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbCr::Debit => "DB",
            DbCr::Credit => "CR",
        }
    }
}

impl FromStr for DbCr {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DB" | "DEBIT" => Ok(DbCr::Debit),
            "CR" | "CREDIT" => Ok(DbCr::Credit),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

impl fmt::Display for DbCr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bank-statement line as stored by the backend.
///
/// `amount` is parsed once here; the rest of the crate never sees the
/// backend's string/number mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txn_date: String,
    #[serde(default, with = "amount")]
    pub amount: Decimal,
    pub db_cr: DbCr,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bank_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_short_name: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub mark_id: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub coa_id: Option<String>,
    #[serde(default)]
    pub internal_report: Option<String>,
    #[serde(default)]
    pub personal_use: Option<String>,
    #[serde(default)]
    pub tax_report: Option<String>,
    #[serde(default, deserialize_with = "bool_flag")]
    pub is_split: bool,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Transaction {
    /// Date part of `txn_date`, without any time component.
    pub fn date(&self) -> &str {
        date_only(&self.txn_date)
    }

    pub fn year(&self) -> &str {
        year_of(self.date())
    }

    /// Canonical plain-decimal rendering used by free-text search.
    pub fn amount_text(&self) -> String {
        self.amount.normalize().to_string()
    }

    /// Signed contribution to a net total: credits add, debits subtract.
    pub fn signed_amount(&self) -> Decimal {
        match self.db_cr {
            DbCr::Credit => self.amount,
            DbCr::Debit => -self.amount,
        }
    }

    pub fn is_marked(&self) -> bool {
        self.mark_id.is_some()
    }
}

/// Upload batch summary, one row per source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default, with = "amount")]
    pub total_debit: Decimal,
    #[serde(default, with = "amount")]
    pub total_credit: Decimal,
    #[serde(default)]
    pub last_upload: Option<String>,
}

/// Selects one import batch for deletion.
///
/// The backend matches `company_id IS NULL` when no company is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBySourceRequest {
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

impl From<&UploadSummary> for DeleteBySourceRequest {
    fn from(summary: &UploadSummary) -> Self {
        Self {
            source_file: summary.source_file.clone().unwrap_or_default(),
            bank_code: summary.bank_code.clone(),
            company_id: summary.company_id.clone(),
        }
    }
}

/// Body of `POST /transactions/export`: the format plus the active filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionExportRequest {
    pub format: ExportFormat,
    #[serde(flatten)]
    pub filters: TransactionFilters,
}
