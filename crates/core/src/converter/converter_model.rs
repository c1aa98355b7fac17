use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{CSV_STATEMENT_BANK, DEFAULT_BANK_CODE, MAX_STATEMENT_BYTES};
use crate::errors::{Error, Result};
use crate::exports::ExportFormat;
use crate::shared::BlobResponse;
use crate::utils::serde_formats::{bool_flag, null_as_default};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Pdf,
    Csv,
}

impl StatementKind {
    /// Kind by file extension, case-insensitive.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(StatementKind::Pdf)
        } else if lower.ends_with(".csv") {
            Some(StatementKind::Csv)
        } else {
            None
        }
    }
}

/// A statement picked for upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl StatementFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn kind(&self) -> Option<StatementKind> {
        StatementKind::from_file_name(&self.file_name)
    }
}

/// Form fields sent alongside the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub bank_code: String,
    pub company_id: Option<String>,
    pub password: Option<String>,
    /// Year for statements whose rows omit it.
    pub statement_year: Option<i32>,
    pub output_format: ExportFormat,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            bank_code: DEFAULT_BANK_CODE.to_string(),
            company_id: None,
            password: None,
            statement_year: None,
            output_format: ExportFormat::default(),
        }
    }
}

/// One `POST /convert` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub file: StatementFile,
    pub options: ConversionOptions,
    /// Preview parses without writing to the ledger.
    pub preview: bool,
}

impl ConvertRequest {
    /// Checks the file the same way the backend would, without the round trip.
    pub fn validate(&self) -> Result<()> {
        let kind = self.file.kind().ok_or_else(|| {
            Error::invalid_input("Invalid file type. Please upload a PDF or CSV file.")
        })?;
        if self.file.bytes.len() > MAX_STATEMENT_BYTES {
            return Err(Error::invalid_input(
                "File size too large. Maximum file size is 10MB.",
            ));
        }
        let csv_bank = self.options.bank_code.eq_ignore_ascii_case(CSV_STATEMENT_BANK);
        match kind {
            StatementKind::Pdf if csv_bank => Err(Error::invalid_input(
                "BRI statements must be in CSV format.",
            )),
            StatementKind::Csv if !csv_bank => Err(Error::invalid_input(
                "CSV files are only supported for BRI bank.",
            )),
            _ => Ok(()),
        }
    }
}

/// Parsed statement rows returned by a preview run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionPreview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bank_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Preview(ConversionPreview),
    /// Converted spreadsheet of a committed run.
    File(BlobResponse),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCheck {
    #[serde(default, alias = "is_protected", deserialize_with = "bool_flag")]
    pub password_protected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(file_name: &str, bank: &str, size: usize) -> ConvertRequest {
        ConvertRequest {
            file: StatementFile::new(file_name, vec![0; size]),
            options: ConversionOptions {
                bank_code: bank.into(),
                ..Default::default()
            },
            preview: true,
        }
    }

    #[test]
    fn test_statement_kind_by_extension() {
        assert_eq!(StatementKind::from_file_name("May.PDF"), Some(StatementKind::Pdf));
        assert_eq!(StatementKind::from_file_name("may.csv"), Some(StatementKind::Csv));
        assert_eq!(StatementKind::from_file_name("may.xlsx"), None);
    }

    #[test]
    fn test_csv_only_for_bri() {
        assert!(request("may.csv", "BRI", 10).validate().is_ok());
        assert!(request("may.csv", "bca", 10).validate().is_err());
        assert!(request("may.pdf", "bri", 10).validate().is_err());
        assert!(request("may.pdf", "bca", 10).validate().is_ok());
    }

    #[test]
    fn test_oversized_file_rejected() {
        let err = request("may.pdf", "bca", MAX_STATEMENT_BYTES + 1)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("10MB"));
    }

    #[test]
    fn test_password_check_accepts_both_keys() {
        let check: PasswordCheck =
            serde_json::from_str(r#"{"password_protected": true}"#).unwrap();
        assert!(check.password_protected);
        let check: PasswordCheck = serde_json::from_str(r#"{"is_protected": 1}"#).unwrap();
        assert!(check.password_protected);
        let check: PasswordCheck = serde_json::from_str("{}").unwrap();
        assert!(!check.password_protected);
    }
}
