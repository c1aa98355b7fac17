//! Filter state of the transaction list and the predicate it defines.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::transactions::transactions_model::{DbCr, Transaction};
use crate::utils::serde_formats::{empty_string_as_none, option_amount, option_string_or_number};

/// One mark-status selector: a pseudo-value or a specific mark id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkStatus {
    Marked,
    Unmarked,
    Mark(String),
}

impl From<String> for MarkStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "marked" => MarkStatus::Marked,
            "unmarked" => MarkStatus::Unmarked,
            _ => MarkStatus::Mark(value),
        }
    }
}

impl From<&str> for MarkStatus {
    fn from(value: &str) -> Self {
        MarkStatus::from(value.to_string())
    }
}

impl From<MarkStatus> for String {
    fn from(value: MarkStatus) -> Self {
        match value {
            MarkStatus::Marked => "marked".to_string(),
            MarkStatus::Unmarked => "unmarked".to_string(),
            MarkStatus::Mark(id) => id,
        }
    }
}

impl fmt::Display for MarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkStatus::Marked => f.write_str("marked"),
            MarkStatus::Unmarked => f.write_str("unmarked"),
            MarkStatus::Mark(id) => f.write_str(id),
        }
    }
}

/// The user's current query over the transaction list.
///
/// Serialized in camelCase; this is the blob persisted per view. Unset
/// fields are omitted. Older blobs stored `""` for unset values and a single
/// string for `markStatus`; both still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionFilters {
    #[serde(
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,
    #[serde(
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_start: Option<String>,
    #[serde(
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_end: Option<String>,
    #[serde(
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub bank: Option<String>,
    #[serde(
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub mark_status: Vec<MarkStatus>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub coa_ids: Vec<String>,
    #[serde(
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub search: Option<String>,
    #[serde(
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub db_cr: Option<DbCr>,
    #[serde(with = "option_amount", skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<Decimal>,
    #[serde(with = "option_amount", skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<Decimal>,
}

/// Accepts `null`, `""`, a single value or an array of strings/numbers.
fn string_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Item {
        Text(String),
        Number(serde_json::Number),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListInput {
        Many(Vec<Item>),
        One(Item),
    }

    let items = match Option::<ListInput>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ListInput::One(item)) => vec![item],
        Some(ListInput::Many(items)) => items,
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Item::Text(s) => s,
            Item::Number(n) => n.to_string(),
        })
        .filter(|s| !s.trim().is_empty())
        .map(T::from)
        .collect())
}

/// A single filter change, as issued by one control of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Year(Option<String>),
    DateStart(Option<String>),
    DateEnd(Option<String>),
    Bank(Option<String>),
    Company(Option<String>),
    MarkStatus(Vec<MarkStatus>),
    CoaIds(Vec<String>),
    Search(Option<String>),
    DbCr(Option<DbCr>),
    AmountMin(Option<Decimal>),
    AmountMax(Option<Decimal>),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TransactionFilters {
    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        *self == TransactionFilters::default()
    }

    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Year(v) => self.year = non_empty(v),
            FilterUpdate::DateStart(v) => self.date_start = non_empty(v),
            FilterUpdate::DateEnd(v) => self.date_end = non_empty(v),
            FilterUpdate::Bank(v) => self.bank = non_empty(v),
            FilterUpdate::Company(v) => self.company = non_empty(v),
            FilterUpdate::MarkStatus(mut v) => {
                v.dedup();
                self.mark_status = v;
            }
            FilterUpdate::CoaIds(mut v) => {
                v.retain(|id| !id.is_empty());
                v.dedup();
                self.coa_ids = v;
            }
            FilterUpdate::Search(v) => self.search = non_empty(v),
            FilterUpdate::DbCr(v) => self.db_cr = v,
            FilterUpdate::AmountMin(v) => self.amount_min = v,
            FilterUpdate::AmountMax(v) => self.amount_max = v,
        }
    }

    /// Tests one transaction against every active criterion.
    ///
    /// Criteria are checked in a fixed order and the first failing one
    /// rejects. Mark status and COA ids are OR-ed within themselves.
    pub fn matches(&self, txn: &Transaction) -> bool {
        let date = txn.date();

        if let Some(year) = &self.year {
            if txn.year() != year {
                return false;
            }
        }
        if let Some(start) = &self.date_start {
            if date < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.date_end {
            if date > end.as_str() {
                return false;
            }
        }
        if let Some(bank) = &self.bank {
            if &txn.bank_code != bank {
                return false;
            }
        }
        if let Some(company) = &self.company {
            if txn.company_id.as_ref() != Some(company) {
                return false;
            }
        }
        if !self.mark_status.is_empty() && !self.matches_mark_status(txn) {
            return false;
        }
        if !self.coa_ids.is_empty() {
            match &txn.coa_id {
                Some(coa_id) if self.coa_ids.contains(coa_id) => {}
                _ => return false,
            }
        }
        if let Some(db_cr) = self.db_cr {
            if txn.db_cr != db_cr {
                return false;
            }
        }
        if let Some(min) = self.amount_min {
            if txn.amount < min {
                return false;
            }
        }
        if let Some(max) = self.amount_max {
            if txn.amount > max {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = txn.description.to_lowercase().contains(&needle)
                || txn.amount_text().contains(&needle)
                || txn
                    .company_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    fn matches_mark_status(&self, txn: &Transaction) -> bool {
        self.mark_status.iter().any(|status| match status {
            MarkStatus::Unmarked => txn.mark_id.is_none(),
            MarkStatus::Marked => txn.mark_id.is_some(),
            MarkStatus::Mark(id) => txn.mark_id.as_ref() == Some(id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn txn(id: &str, date: &str, amount: Decimal, db_cr: DbCr) -> Transaction {
        Transaction {
            id: id.into(),
            txn_date: date.into(),
            amount,
            db_cr,
            bank_code: "BCA".into(),
            description: format!("Payment {}", id),
            company_id: None,
            company_name: None,
            company_short_name: None,
            mark_id: None,
            coa_id: None,
            internal_report: None,
            personal_use: None,
            tax_report: None,
            is_split: false,
            source_file: None,
            notes: None,
            currency: None,
            created_at: None,
        }
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = TransactionFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&txn("1", "", dec!(0), DbCr::Debit)));
    }

    #[test]
    fn test_date_range_uses_date_part() {
        let filters = TransactionFilters {
            date_start: Some("2024-01-05".into()),
            date_end: Some("2024-01-31".into()),
            ..Default::default()
        };
        assert!(filters.matches(&txn("1", "2024-01-05 23:59:59", dec!(1), DbCr::Debit)));
        assert!(filters.matches(&txn("2", "2024-01-31T08:00:00", dec!(1), DbCr::Debit)));
        assert!(!filters.matches(&txn("3", "2024-02-01", dec!(1), DbCr::Debit)));
        assert!(!filters.matches(&txn("4", "2024-01-04", dec!(1), DbCr::Debit)));
    }

    #[test]
    fn test_amount_bounds_are_inclusive() {
        let filters = TransactionFilters {
            amount_min: Some(dec!(500)),
            amount_max: Some(dec!(1000)),
            ..Default::default()
        };
        assert!(filters.matches(&txn("1", "2024-01-01", dec!(500), DbCr::Credit)));
        assert!(filters.matches(&txn("2", "2024-01-01", dec!(1000), DbCr::Credit)));
        assert!(!filters.matches(&txn("3", "2024-01-01", dec!(1000.01), DbCr::Credit)));
        assert!(!filters.matches(&txn("4", "2024-01-01", dec!(499.99), DbCr::Credit)));
    }

    #[test]
    fn test_search_covers_description_amount_and_company() {
        let mut t = txn("1", "2024-01-01", dec!(1250.50), DbCr::Credit);
        t.company_name = Some("PT Sinar Jaya".into());

        let search = |s: &str| TransactionFilters {
            search: Some(s.into()),
            ..Default::default()
        };
        assert!(search("PAYMENT").matches(&t));
        assert!(search("1250.5").matches(&t));
        assert!(search("sinar").matches(&t));
        assert!(!search("1,250").matches(&t));
    }

    #[test]
    fn test_mark_status_is_or_within() {
        let mut marked = txn("1", "2024-01-01", dec!(1), DbCr::Debit);
        marked.mark_id = Some("m7".into());
        let unmarked = txn("2", "2024-01-01", dec!(1), DbCr::Debit);

        let filters = TransactionFilters {
            mark_status: vec![MarkStatus::Marked],
            ..Default::default()
        };
        assert!(filters.matches(&marked));
        assert!(!filters.matches(&unmarked));

        let filters = TransactionFilters {
            mark_status: vec![MarkStatus::Marked, MarkStatus::Unmarked],
            ..Default::default()
        };
        assert!(filters.matches(&marked));
        assert!(filters.matches(&unmarked));
    }

    #[test]
    fn test_coa_filter_requires_membership() {
        let mut coded = txn("1", "2024-01-01", dec!(1), DbCr::Debit);
        coded.coa_id = Some("11".into());
        let uncoded = txn("2", "2024-01-01", dec!(1), DbCr::Debit);
        let filters = TransactionFilters {
            coa_ids: vec!["11".into(), "12".into()],
            ..Default::default()
        };
        assert!(filters.matches(&coded));
        assert!(!filters.matches(&uncoded));
    }

    #[test]
    fn test_apply_normalizes_empty_strings() {
        let mut filters = TransactionFilters::default();
        filters.apply(FilterUpdate::Bank(Some("BRI".into())));
        filters.apply(FilterUpdate::Search(Some(String::new())));
        assert_eq!(filters.bank.as_deref(), Some("BRI"));
        assert_eq!(filters.search, None);
        filters.apply(FilterUpdate::Bank(Some(String::new())));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_blob_round_trip_uses_camel_case() {
        let filters = TransactionFilters {
            year: Some("2024".into()),
            mark_status: vec![MarkStatus::Unmarked, MarkStatus::Mark("m42".into())],
            db_cr: Some(DbCr::Credit),
            amount_min: Some(dec!(1000)),
            ..Default::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["markStatus"], serde_json::json!(["unmarked", "m42"]));
        assert_eq!(json["amountMin"], "1000");
        assert!(json.get("dateStart").is_none());

        let back: TransactionFilters = serde_json::from_value(json).unwrap();
        assert_eq!(back, filters);
    }

    #[test]
    fn test_legacy_blob_loads() {
        let legacy = serde_json::json!({
            "year": 2023,
            "dateStart": "",
            "bank": "",
            "markStatus": "marked",
            "dbCr": "",
            "amountMin": null,
            "amountMax": "5,000",
            "savedAt": "2024-05-01T10:00:00Z"
        });
        let filters: TransactionFilters = serde_json::from_value(legacy).unwrap();
        assert_eq!(filters.year.as_deref(), Some("2023"));
        assert_eq!(filters.date_start, None);
        assert_eq!(filters.mark_status, vec![MarkStatus::Marked]);
        assert_eq!(filters.db_cr, None);
        assert_eq!(filters.amount_max, Some(dec!(5000)));
    }
}
