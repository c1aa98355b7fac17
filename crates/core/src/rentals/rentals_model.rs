use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::utils::serde_formats::{
    bool_flag, null_as_default, option_amount, option_string_or_number, string_or_number,
};

pub const DEFAULT_RENTAL_STATUS: &str = "active";

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(())
}

fn default_status() -> String {
    DEFAULT_RENTAL_STATUS.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalContract {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub store_id: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub location_id: Option<String>,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub landlord_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, with = "option_amount")]
    pub total_amount: Option<Decimal>,
    #[serde(default = "default_status", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalContractInput {
    pub company_id: String,
    pub store_id: String,
    pub location_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlord_name: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, with = "option_amount", skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Payments to attach to the new contract.
    #[serde(default)]
    pub linked_transaction_ids: Vec<String>,
}

impl Default for RentalContractInput {
    fn default() -> Self {
        Self {
            company_id: String::new(),
            store_id: String::new(),
            location_id: String::new(),
            contract_number: None,
            landlord_name: None,
            start_date: String::new(),
            end_date: String::new(),
            total_amount: None,
            status: default_status(),
            notes: None,
            linked_transaction_ids: Vec::new(),
        }
    }
}

impl RentalContractInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.company_id, "company_id")?;
        require(&self.store_id, "store_id")?;
        require(&self.location_id, "location_id")?;
        require(&self.start_date, "start_date")?;
        require(&self.end_date, "end_date")?;
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidInput(
                "Contract end date is before its start date".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Result of creating a contract. The backend books a prepaid expense for the
/// linked payments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractCreated {
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "bool_flag")]
    pub prepaid_auto_created: bool,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub prepaid_expense_id: Option<String>,
    #[serde(default, with = "option_amount")]
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalLocation {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub postal_code: Option<String>,
    #[serde(default, with = "option_amount")]
    pub latitude: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub longitude: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub area_sqm: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalLocationInput {
    pub company_id: String,
    pub location_name: String,
    pub address: String,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default, with = "option_amount")]
    pub latitude: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub longitude: Option<Decimal>,
    #[serde(default, with = "option_amount")]
    pub area_sqm: Option<Decimal>,
    pub notes: Option<String>,
}

impl RentalLocationInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.company_id, "company_id")?;
        require(&self.location_name, "location_name")?;
        require(&self.address, "address")
    }
}

/// A shop unit (`/stores`) that occupies a rental location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalOutlet {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub store_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub store_name: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub current_location_id: Option<String>,
    #[serde(default = "default_status", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalOutletInput {
    pub company_id: String,
    pub store_code: String,
    pub store_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location_id: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for RentalOutletInput {
    fn default() -> Self {
        Self {
            company_id: String::new(),
            store_code: String::new(),
            store_name: String::new(),
            current_location_id: None,
            status: default_status(),
            notes: None,
        }
    }
}

impl RentalOutletInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.company_id, "company_id")?;
        require(&self.store_code, "store_code")?;
        require(&self.store_name, "store_name")
    }
}
