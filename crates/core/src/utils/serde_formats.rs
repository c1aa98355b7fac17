//! Serde helpers that normalize the backend's loosely typed JSON once, at the
//! API boundary.
//!
//! The backend is inconsistent about amounts (`1000`, `1000.0`, `"1,000"`),
//! identifiers (`1` vs `"1"`), flags (`true` vs `1`) and empty values (`null`
//! vs `""`). Models use these helpers so the rest of the crate only sees
//! `Decimal`, `String` and `bool`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Number;
use std::fmt::Display;
use std::str::FromStr;

use crate::errors::ValidationError;

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarInput {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

/// Parses an amount, stripping thousands separators.
///
/// `"1,000.50"` -> `1000.50`. Empty input is rejected; callers decide what an
/// empty amount means.
pub fn parse_amount(value: &str) -> Result<Decimal, ValidationError> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(ValidationError::InvalidInput("empty amount".to_string()));
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|e| ValidationError::InvalidInput(format!("Invalid amount '{}': {}", value, e)))
}

fn number_to_decimal(n: &Number) -> Result<Decimal, ValidationError> {
    parse_amount(&n.to_string())
}

/// Required amount. `null` and `""` become zero.
pub mod amount {
    use super::*;
    use serde::Serializer;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match ScalarInput::deserialize(deserializer)? {
            ScalarInput::Null => Ok(Decimal::ZERO),
            ScalarInput::String(s) if s.trim().is_empty() => Ok(Decimal::ZERO),
            ScalarInput::String(s) => parse_amount(&s).map_err(serde::de::Error::custom),
            ScalarInput::Number(n) => number_to_decimal(&n).map_err(serde::de::Error::custom),
            ScalarInput::Bool(_) => Err(serde::de::Error::custom("Invalid amount type: bool")),
        }
    }

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.normalize().to_string())
    }
}

/// Optional amount. `null`, absent and `""` become `None`.
pub mod option_amount {
    use super::*;
    use serde::Serializer;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<ScalarInput>::deserialize(deserializer)? {
            None | Some(ScalarInput::Null) => Ok(None),
            Some(ScalarInput::String(s)) if s.trim().is_empty() => Ok(None),
            Some(ScalarInput::String(s)) => {
                parse_amount(&s).map(Some).map_err(serde::de::Error::custom)
            }
            Some(ScalarInput::Number(n)) => number_to_decimal(&n)
                .map(Some)
                .map_err(serde::de::Error::custom),
            Some(ScalarInput::Bool(_)) => {
                Err(serde::de::Error::custom("Invalid amount type: bool"))
            }
        }
    }

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.normalize().to_string()),
            None => serializer.serialize_none(),
        }
    }
}

/// Identifier or code sent either as a string or as an integer.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match ScalarInput::deserialize(deserializer)? {
        ScalarInput::String(s) => Ok(s),
        ScalarInput::Number(n) => Ok(n.to_string()),
        ScalarInput::Bool(_) => Err(serde::de::Error::custom("Invalid identifier type: bool")),
        ScalarInput::Null => Err(serde::de::Error::custom("expected a string or number")),
    }
}

/// Optional reference. `null`, absent and `""` become `None`.
pub fn option_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<ScalarInput>::deserialize(deserializer)? {
        None | Some(ScalarInput::Null) => Ok(None),
        Some(ScalarInput::String(s)) if s.trim().is_empty() => Ok(None),
        Some(ScalarInput::String(s)) => Ok(Some(s)),
        Some(ScalarInput::Number(n)) => Ok(Some(n.to_string())),
        Some(ScalarInput::Bool(_)) => {
            Err(serde::de::Error::custom("Invalid identifier type: bool"))
        }
    }
}

/// Boolean flag that MySQL-backed endpoints send as `0`/`1`.
pub fn bool_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ScalarInput>::deserialize(deserializer)? {
        None | Some(ScalarInput::Null) => false,
        Some(ScalarInput::Bool(b)) => b,
        Some(ScalarInput::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(ScalarInput::String(s)) => {
            matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes")
        }
    })
}

/// `null` deserializes as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional `FromStr` value where `""` means "not set".
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => T::from_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde::Serialize;

    #[derive(Debug, Deserialize, Serialize)]
    struct Row {
        #[serde(with = "amount")]
        amount: Decimal,
        #[serde(default, with = "option_amount")]
        limit: Option<Decimal>,
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "option_string_or_number")]
        mark_id: Option<String>,
        #[serde(default, deserialize_with = "bool_flag")]
        is_split: bool,
    }

    #[test]
    fn test_parse_amount_strips_thousands_separators() {
        assert_eq!(parse_amount("1,000").unwrap(), dec!(1000));
        assert_eq!(parse_amount(" 12,345.67 ").unwrap(), dec!(12345.67));
        assert_eq!(parse_amount("-500").unwrap(), dec!(-500));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_row_accepts_mixed_representations() {
        let row: Row = serde_json::from_str(
            r#"{"amount":"1,000","limit":250.5,"id":7,"mark_id":"","is_split":1}"#,
        )
        .unwrap();
        assert_eq!(row.amount, dec!(1000));
        assert_eq!(row.limit, Some(dec!(250.5)));
        assert_eq!(row.id, "7");
        assert_eq!(row.mark_id, None);
        assert!(row.is_split);
    }

    #[test]
    fn test_row_null_amount_is_zero() {
        let row: Row =
            serde_json::from_str(r#"{"amount":null,"id":"a","mark_id":null}"#).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);
        assert_eq!(row.limit, None);
        assert!(!row.is_split);
    }

    #[test]
    fn test_malformed_amount_is_rejected() {
        let result = serde_json::from_str::<Row>(r#"{"amount":"12x","id":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bool_identifier_is_rejected() {
        let result = serde_json::from_str::<Row>(r#"{"amount":1,"id":true}"#);
        assert!(result.unwrap_err().to_string().contains("bool"));

        let result = serde_json::from_str::<Row>(r#"{"amount":1,"id":"a","mark_id":false}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_amount_serializes_as_plain_string() {
        let row: Row = serde_json::from_str(r#"{"amount":1000.0,"id":"a"}"#).unwrap();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["amount"], "1000");
        assert!(json["limit"].is_null());
    }
}
