//! Amortization domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::{
    DEFAULT_AMORTIZATION_ASSET_MARKS, DEFAULT_AMORTIZATION_COA_CODE,
    DEFAULT_AMORTIZATION_RATE, DEFAULT_ASSET_USEFUL_LIFE,
};
use crate::errors::{Result, ValidationError};
use crate::utils::serde_formats::{
    amount, bool_flag, null_as_default, option_amount, option_string_or_number,
    string_or_number,
};

/// Fiscal asset class. Groups of any other class are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum AssetType {
    #[default]
    Tangible,
    Intangible,
    Building,
    Other(String),
}

impl AssetType {
    pub fn as_str(&self) -> &str {
        match self {
            AssetType::Tangible => "Tangible",
            AssetType::Intangible => "Intangible",
            AssetType::Building => "Building",
            AssetType::Other(other) => other,
        }
    }
}

impl From<String> for AssetType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tangible" => AssetType::Tangible,
            "intangible" => AssetType::Intangible,
            "building" => AssetType::Building,
            _ => AssetType::Other(value),
        }
    }
}

impl From<AssetType> for String {
    fn from(value: AssetType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Asset groups
// ─────────────────────────────────────────────────────────────────────────────

/// A depreciation group with its statutory rates.
///
/// Rows with no `company_id` are global defaults; the backend already prefers
/// the company row when both exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetGroup {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub group_number: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_type: AssetType,
    #[serde(default, with = "option_amount")]
    pub tarif_rate: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub tarif_half_rate: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub useful_life_years: Option<Decimal>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetGroupInput {
    pub group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    pub asset_type: AssetType,
    #[serde(default, with = "option_amount")]
    pub tarif_rate: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub tarif_half_rate: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub useful_life_years: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

impl AssetGroupInput {
    pub fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            return Err(ValidationError::MissingField("group_name".to_string()).into());
        }
        Ok(())
    }
}

/// Asset groups bucketed by the three standard asset classes.
///
/// Groups of any other class are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedAssetGroups {
    pub tangible: Vec<AssetGroup>,
    pub intangible: Vec<AssetGroup>,
    pub building: Vec<AssetGroup>,
}

impl GroupedAssetGroups {
    pub fn of(groups: &[AssetGroup]) -> Self {
        let mut grouped = Self::default();
        for group in groups {
            match group.asset_type {
                AssetType::Tangible => grouped.tangible.push(group.clone()),
                AssetType::Intangible => grouped.intangible.push(group.clone()),
                AssetType::Building => grouped.building.push(group.clone()),
                AssetType::Other(_) => {}
            }
        }
        grouped
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registered assets and calculations
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_name: String,
    #[serde(default)]
    pub asset_description: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub asset_group_id: Option<String>,
    #[serde(default)]
    pub acquisition_date: Option<String>,
    #[serde(default, with = "amount")]
    pub acquisition_cost: Decimal,
    #[serde(default)]
    pub amortization_start_date: Option<String>,
    #[serde(default, deserialize_with = "bool_flag")]
    pub use_half_rate: bool,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub asset_type: Option<AssetType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetInput {
    pub company_id: String,
    pub asset_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_group_id: Option<String>,
    pub acquisition_date: String,
    #[serde(with = "amount")]
    pub acquisition_cost: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amortization_start_date: Option<String>,
    pub use_half_rate: bool,
}

impl AssetInput {
    pub fn validate(&self) -> Result<()> {
        if self.asset_name.trim().is_empty() {
            return Err(ValidationError::MissingField("asset_name".to_string()).into());
        }
        if self.acquisition_date.trim().is_empty() {
            return Err(ValidationError::MissingField("acquisition_date".to_string()).into());
        }
        Ok(())
    }
}

/// One asset's depreciation for the calculated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationCalculation {
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub asset_name: Option<String>,
    #[serde(default)]
    pub asset_type: Option<AssetType>,
    #[serde(default, with = "amount")]
    pub acquisition_cost: Decimal,
    #[serde(default, with = "amount")]
    pub annual_amortization: Decimal,
    #[serde(default, with = "amount")]
    pub accumulated_depreciation_prev_year: Decimal,
    #[serde(default, with = "amount")]
    pub book_value_end_year: Decimal,
}

/// Sum of `annual_amortization` over a calculation run.
pub fn total_amortization(calculations: &[AmortizationCalculation]) -> Decimal {
    calculations.iter().map(|c| c.annual_amortization).sum()
}

// ─────────────────────────────────────────────────────────────────────────────
// Amortization items
// ─────────────────────────────────────────────────────────────────────────────

/// A row of the amortization schedule.
///
/// Manual items carry an `id`; rows derived from marked transactions or
/// registered assets do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationItem {
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub mark_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub amortization_date: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub asset_group_id: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub asset_type: Option<AssetType>,
    #[serde(default, deserialize_with = "bool_flag")]
    pub use_half_rate: bool,
    #[serde(default, deserialize_with = "bool_flag")]
    pub is_manual: bool,
    #[serde(default, with = "amount")]
    pub annual_amortization: Decimal,
    #[serde(default, with = "amount")]
    pub book_value_end_year: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `GET /amortization-items` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationItems {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<AmortizationItem>,
    #[serde(default, alias = "totalAmount", with = "amount")]
    pub total_amount: Decimal,
    #[serde(default, with = "amount")]
    pub calculated_total: Decimal,
    #[serde(default, with = "amount")]
    pub manual_total: Decimal,
    #[serde(default, with = "amount")]
    pub grand_total: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationItemInput {
    pub company_id: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_id: Option<String>,
    pub description: String,
    #[serde(with = "amount")]
    pub amount: Decimal,
    pub amortization_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_group_id: Option<String>,
    pub use_half_rate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_manual: bool,
}

impl AmortizationItemInput {
    pub fn validate(&self) -> Result<()> {
        if self.company_id.trim().is_empty() {
            return Err(ValidationError::MissingField("company_id".to_string()).into());
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description".to_string()).into());
        }
        Ok(())
    }
}

/// `{company_id, year}` body shared by calculate and journal generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    pub company_id: String,
    pub year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalGeneration {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub journal_count: u64,
    #[serde(default)]
    pub items_processed: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Expense account codes amortization is booked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationCoaCodes {
    #[serde(default = "default_coa_codes", deserialize_with = "coa_codes_or_default")]
    pub coa_codes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coa_details: Vec<Value>,
}

fn default_coa_codes() -> Vec<String> {
    vec![DEFAULT_AMORTIZATION_COA_CODE.to_string()]
}

fn coa_codes_or_default<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let codes = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(if codes.is_empty() {
        default_coa_codes()
    } else {
        codes
    })
}

impl Default for AmortizationCoaCodes {
    fn default() -> Self {
        Self {
            coa_codes: default_coa_codes(),
            coa_details: Vec::new(),
        }
    }
}

/// Mark-based amortization switches. Keys this client does not model are
/// carried through `extra` so a save does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAmortizationSettings {
    #[serde(default, deserialize_with = "bool_flag")]
    pub use_mark_based_amortization: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amortization_asset_marks: Vec<String>,
    #[serde(default = "default_useful_life", deserialize_with = "string_or_number")]
    pub default_asset_useful_life: String,
    #[serde(default = "default_rate", deserialize_with = "string_or_number")]
    pub default_amortization_rate: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_useful_life() -> String {
    DEFAULT_ASSET_USEFUL_LIFE.to_string()
}

fn default_rate() -> String {
    DEFAULT_AMORTIZATION_RATE.to_string()
}

impl Default for MarkAmortizationSettings {
    fn default() -> Self {
        Self {
            use_mark_based_amortization: false,
            amortization_asset_marks: DEFAULT_AMORTIZATION_ASSET_MARKS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            default_asset_useful_life: default_useful_life(),
            default_amortization_rate: default_rate(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkSettings {
    #[serde(default)]
    pub settings: MarkAmortizationSettings,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_marks: Vec<Value>,
}

/// Depreciation parameters attached to an asset mark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkAmortizationMapping {
    pub mark_id: String,
    pub asset_type: AssetType,
    #[serde(default, with = "option_amount")]
    pub useful_life_years: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub amortization_rate: Option<Decimal>,
    pub asset_group_id: Option<String>,
    pub is_deductible_50_percent: bool,
}

/// A mark whose transactions can be amortized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleMark {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub personal_use: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_type: AssetType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn group(id: &str, asset_type: &str) -> AssetGroup {
        serde_json::from_value(json!({
            "id": id,
            "group_name": format!("Group {}", id),
            "group_number": 1,
            "asset_type": asset_type,
            "tarif_rate": 25.0,
        }))
        .unwrap()
    }

    #[test]
    fn test_grouping_skips_unknown_classes() {
        let groups = vec![
            group("1", "Tangible"),
            group("2", "Building"),
            group("3", "LandRights"),
            group("4", "Tangible"),
        ];
        let grouped = GroupedAssetGroups::of(&groups);
        assert_eq!(grouped.tangible.len(), 2);
        assert_eq!(grouped.building.len(), 1);
        assert!(grouped.intangible.is_empty());
        assert_eq!(groups[2].asset_type, AssetType::Other("LandRights".into()));
        assert_eq!(groups[0].tarif_rate, Some(dec!(25)));
    }

    #[test]
    fn test_items_accept_camel_case_total() {
        let items: AmortizationItems = serde_json::from_value(json!({
            "items": [{"description": "Laptop", "amount": 12000000, "annual_amortization": 3000000}],
            "totalAmount": 12000000,
            "calculated_total": 3000000,
            "settings": {}
        }))
        .unwrap();
        assert_eq!(items.total_amount, dec!(12000000));
        assert_eq!(items.items[0].id, None);
        assert_eq!(items.items[0].annual_amortization, dec!(3000000));
    }

    #[test]
    fn test_empty_coa_codes_fall_back_to_default() {
        let codes: AmortizationCoaCodes =
            serde_json::from_value(json!({"coa_codes": [], "coa_details": null})).unwrap();
        assert_eq!(codes.coa_codes, vec!["5314"]);
        assert!(codes.coa_details.is_empty());
    }

    #[test]
    fn test_mark_settings_keep_unmodelled_keys() {
        let settings: MarkSettings = serde_json::from_value(json!({
            "settings": {
                "use_mark_based_amortization": "true",
                "default_asset_useful_life": 4,
                "allow_partial_year": true
            }
        }))
        .unwrap();
        let s = &settings.settings;
        assert!(s.use_mark_based_amortization);
        assert_eq!(s.default_asset_useful_life, "4");
        assert_eq!(s.default_amortization_rate, "20.00");
        assert_eq!(s.extra["allow_partial_year"], json!(true));

        let back = serde_json::to_value(s).unwrap();
        assert_eq!(back["allow_partial_year"], json!(true));
    }

    #[test]
    fn test_total_amortization_sums_annual_amounts() {
        let calcs: Vec<AmortizationCalculation> = serde_json::from_value(json!([
            {"asset_id": 1, "annual_amortization": "1,500.50"},
            {"asset_id": 2, "annual_amortization": 499.5}
        ]))
        .unwrap();
        assert_eq!(total_amortization(&calcs), dec!(2000));
    }
}
