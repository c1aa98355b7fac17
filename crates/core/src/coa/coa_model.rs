//! Chart of accounts domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Result, ValidationError};
use crate::utils::serde_formats::{
    bool_flag, null_as_default, option_string_or_number, string_or_number,
};

/// Ledger account category.
///
/// The five standard categories get their own variants; anything else the
/// backend uses (`COGS`, `OTHER_INCOME`, ...) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoaCategory {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
    Other(String),
}

impl CoaCategory {
    pub fn as_str(&self) -> &str {
        match self {
            CoaCategory::Asset => "ASSET",
            CoaCategory::Liability => "LIABILITY",
            CoaCategory::Equity => "EQUITY",
            CoaCategory::Revenue => "REVENUE",
            CoaCategory::Expense => "EXPENSE",
            CoaCategory::Other(other) => other,
        }
    }
}

impl From<String> for CoaCategory {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "ASSET" => CoaCategory::Asset,
            "LIABILITY" => CoaCategory::Liability,
            "EQUITY" => CoaCategory::Equity,
            "REVENUE" => CoaCategory::Revenue,
            "EXPENSE" => CoaCategory::Expense,
            _ => CoaCategory::Other(value),
        }
    }
}

impl From<CoaCategory> for String {
    fn from(value: CoaCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CoaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the journal a mark is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MappingType {
    #[default]
    #[serde(alias = "debit", alias = "DB")]
    Debit,
    #[serde(alias = "credit", alias = "CR")]
    Credit,
}

impl std::str::FromStr for MappingType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBIT" | "DB" => Ok(MappingType::Debit),
            "CREDIT" | "CR" => Ok(MappingType::Credit),
            _ => Err(format!("Invalid mapping type: {}", s)),
        }
    }
}

/// Chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOfAccount {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub category: CoaCategory,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active", deserialize_with = "bool_flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub parent_id: Option<String>,
}

fn default_active() -> bool {
    true
}

impl ChartOfAccount {
    /// `"{code} - {name}"`, the label used in account pickers.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Payload for creating or updating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoaInput {
    pub code: String,
    pub name: String,
    pub category: CoaCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl CoaInput {
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() || self.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Code, name, and category are required".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// The five standard buckets. Accounts in other categories are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoaGroups {
    pub asset: Vec<ChartOfAccount>,
    pub liability: Vec<ChartOfAccount>,
    pub equity: Vec<ChartOfAccount>,
    pub revenue: Vec<ChartOfAccount>,
    pub expense: Vec<ChartOfAccount>,
}

impl CoaGroups {
    pub fn bucket(&self, category: &CoaCategory) -> &[ChartOfAccount] {
        match category {
            CoaCategory::Asset => &self.asset,
            CoaCategory::Liability => &self.liability,
            CoaCategory::Equity => &self.equity,
            CoaCategory::Revenue => &self.revenue,
            CoaCategory::Expense => &self.expense,
            CoaCategory::Other(_) => &[],
        }
    }
}

pub fn coa_by_category(accounts: &[ChartOfAccount]) -> CoaGroups {
    let mut groups = CoaGroups::default();
    for account in accounts {
        let bucket = match account.category {
            CoaCategory::Asset => &mut groups.asset,
            CoaCategory::Liability => &mut groups.liability,
            CoaCategory::Equity => &mut groups.equity,
            CoaCategory::Revenue => &mut groups.revenue,
            CoaCategory::Expense => &mut groups.expense,
            CoaCategory::Other(_) => continue,
        };
        bucket.push(account.clone());
    }
    groups
}

/// Picker entry for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoaOption {
    pub value: String,
    pub label: String,
    pub category: CoaCategory,
}

pub fn coa_options(accounts: &[ChartOfAccount]) -> Vec<CoaOption> {
    accounts
        .iter()
        .map(|coa| CoaOption {
            value: coa.id.clone(),
            label: coa.label(),
            category: coa.category.clone(),
        })
        .collect()
}

/// A mark-to-account mapping with the account columns joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkCoaMapping {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub mark_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub coa_id: String,
    #[serde(default)]
    pub mapping_type: MappingType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<CoaCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMarkCoaMapping {
    pub coa_id: String,
    pub mapping_type: MappingType,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coa(id: &str, code: &str, category: &str) -> ChartOfAccount {
        ChartOfAccount {
            id: id.into(),
            code: code.into(),
            name: format!("Account {}", code),
            category: CoaCategory::from(category.to_string()),
            subcategory: None,
            description: None,
            is_active: true,
            parent_id: None,
        }
    }

    #[test]
    fn test_unknown_category_is_preserved() {
        let parsed: ChartOfAccount = serde_json::from_str(
            r#"{"id":1,"code":5101,"name":"HPP","category":"COGS","is_active":1}"#,
        )
        .unwrap();
        assert_eq!(parsed.category, CoaCategory::Other("COGS".into()));
        assert_eq!(parsed.code, "5101");
        assert_eq!(serde_json::to_value(&parsed.category).unwrap(), "COGS");
    }

    #[test]
    fn test_grouping_uses_five_buckets() {
        let accounts = vec![
            coa("1", "1101", "ASSET"),
            coa("2", "4101", "REVENUE"),
            coa("3", "5101", "COGS"),
            coa("4", "6101", "EXPENSE"),
            coa("5", "1102", "ASSET"),
        ];
        let groups = coa_by_category(&accounts);
        assert_eq!(groups.asset.len(), 2);
        assert_eq!(groups.revenue.len(), 1);
        assert_eq!(groups.expense.len(), 1);
        assert!(groups.liability.is_empty());
        assert!(groups.bucket(&CoaCategory::Other("COGS".into())).is_empty());
    }

    #[test]
    fn test_option_label() {
        let options = coa_options(&[coa("7", "1101", "ASSET")]);
        assert_eq!(options[0].label, "1101 - Account 1101");
        assert_eq!(options[0].value, "7");
    }

    #[test]
    fn test_mapping_type_wire_values() {
        let parsed: MappingType = serde_json::from_str(r#""CREDIT""#).unwrap();
        assert_eq!(parsed, MappingType::Credit);
        assert_eq!(serde_json::to_value(MappingType::Debit).unwrap(), "DEBIT");
    }
}
