//! Export file naming and writing.
//!
//! Export endpoints answer with a binary body plus an optional
//! `content-disposition` header. The browser front-end turned that into a
//! transient object URL; here it becomes an [`ExportedFile`] the caller can
//! write wherever it likes.

use chrono::NaiveDate;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::errors::{Error, Result};
use crate::shared::BlobResponse;

/// Requested export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Excel,
    Csv,
}

impl ExportFormat {
    /// File extension for the format: `excel` -> `xlsx`, anything else -> `csv`.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!("Invalid export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn filename_regex() -> &'static Regex {
    static FILENAME_RE: OnceLock<Regex> = OnceLock::new();
    FILENAME_RE.get_or_init(|| {
        Regex::new(r#"filename="?([^";]+)"?"#).expect("filename pattern is valid")
    })
}

/// Extracts the file name from a `content-disposition` header value.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    filename_regex()
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// File name for an export: the header's file name when present, else
/// `{prefix}_{date}.{ext}`.
pub fn export_file_name(
    prefix: &str,
    format: ExportFormat,
    content_disposition: Option<&str>,
    today: NaiveDate,
) -> String {
    content_disposition
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| {
            format!(
                "{}_{}.{}",
                prefix,
                today.format("%Y-%m-%d"),
                format.extension()
            )
        })
}

/// A downloaded export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn from_blob(prefix: &str, format: ExportFormat, blob: BlobResponse, today: NaiveDate) -> Self {
        let file_name = export_file_name(prefix, format, blob.content_disposition.as_deref(), today);
        Self {
            file_name,
            bytes: blob.bytes,
        }
    }

    /// Writes the file into `dir` and returns the full path.
    ///
    /// Only the final path component of the server-supplied name is used.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let name = Path::new(&self.file_name)
            .file_name()
            .ok_or_else(|| Error::invalid_input(format!("Invalid file name: {}", self.file_name)))?;
        let path = dir.join(name);
        debug!("Writing export ({} bytes) to {}", self.bytes.len(), path.display());
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_extension_follows_format() {
        assert_eq!(ExportFormat::Excel.extension(), "xlsx");
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!("EXCEL".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_filename_from_header() {
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="mutasi_bca.xlsx""#),
            Some("mutasi_bca.xlsx".to_string())
        );
        assert_eq!(
            filename_from_content_disposition("attachment; filename=report.csv; size=10"),
            Some("report.csv".to_string())
        );
        assert_eq!(filename_from_content_disposition("attachment"), None);
    }

    #[test]
    fn test_default_name_uses_date() {
        assert_eq!(
            export_file_name("transactions", ExportFormat::Excel, None, day()),
            "transactions_2024-03-09.xlsx"
        );
        assert_eq!(
            export_file_name("transactions", ExportFormat::Csv, Some("inline"), day()),
            "transactions_2024-03-09.csv"
        );
    }

    #[tokio::test]
    async fn test_save_to_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExportedFile::from_blob(
            "transactions",
            ExportFormat::Csv,
            BlobResponse {
                bytes: b"id,amount\n1,1000\n".to_vec(),
                content_disposition: Some(r#"attachment; filename="../../etc/out.csv""#.into()),
            },
            day(),
        );
        let path = file.save_to(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("out.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"id,amount\n1,1000\n");
    }
}
