use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::transactions::DbCr;
use crate::utils::serde_formats::{
    amount, bool_flag, null_as_default, option_string_or_number, string_or_number,
};

/// Batch header as listed for a company, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HppBatch {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub batch_date: Option<String>,
    #[serde(default, with = "amount")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub txn_count: u64,
    #[serde(default)]
    pub product_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_prices: Vec<BatchUnitPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUnitPrice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, with = "amount")]
    pub unit_price: Decimal,
}

/// A purchase transaction as seen from the batch editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTransaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txn_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, with = "amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub db_cr: Option<DbCr>,
    #[serde(default)]
    pub mark: Option<String>,
    /// Already part of some batch.
    #[serde(default, deserialize_with = "bool_flag")]
    pub is_linked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProduct {
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default, with = "amount")]
    pub quantity: Decimal,
    #[serde(default)]
    pub foreign_currency: Option<String>,
    #[serde(default, with = "amount")]
    pub foreign_price: Decimal,
    #[serde(default, with = "amount")]
    pub calculated_total_idr: Decimal,
    #[serde(default, with = "amount")]
    pub calculated_unit_idr_hpp: Decimal,
}

/// `GET /hpp-batches/{id}` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDetails {
    pub batch: HppBatch,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<BatchTransaction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<BatchProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProductInput {
    pub product_id: String,
    #[serde(with = "amount")]
    pub quantity: Decimal,
    pub foreign_currency: String,
    #[serde(with = "amount")]
    pub foreign_price: Decimal,
}

/// Create (no `id`) or replace a batch with its links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveBatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub company_id: String,
    #[serde(default)]
    pub memo: String,
    pub batch_date: String,
    pub transaction_ids: Vec<String>,
    pub products: Vec<BatchProductInput>,
}

impl SaveBatchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.company_id.trim().is_empty() {
            return Err(ValidationError::MissingField("company_id".to_string()).into());
        }
        if self.transaction_ids.is_empty() {
            return Err(ValidationError::InvalidInput(
                "At least one transaction must be selected".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedBatch {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub batch_id: Option<String>,
    #[serde(default, with = "amount")]
    pub total_amount: Decimal,
}

/// One product's share of a batch total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostAllocation {
    pub product_id: String,
    pub total_idr: Decimal,
    pub unit_idr: Decimal,
}

/// Splits `total_idr` across products in proportion to quantity times
/// foreign price, as the backend does when a batch is saved.
///
/// Products get zero when the batch has no foreign value; unit cost is zero
/// for a zero quantity.
pub fn allocate_costs(total_idr: Decimal, products: &[BatchProductInput]) -> Vec<CostAllocation> {
    let foreign_total: Decimal = products.iter().map(|p| p.quantity * p.foreign_price).sum();
    products
        .iter()
        .map(|p| {
            let total = if foreign_total.is_zero() {
                Decimal::ZERO
            } else {
                total_idr * (p.quantity * p.foreign_price) / foreign_total
            };
            let unit = if p.quantity > Decimal::ZERO {
                total / p.quantity
            } else {
                Decimal::ZERO
            };
            CostAllocation {
                product_id: p.product_id.clone(),
                total_idr: total,
                unit_idr: unit,
            }
        })
        .collect()
}
