//! Mark domain models.

use serde::{Deserialize, Serialize};

use crate::coa::MappingType;
use crate::errors::{Result, ValidationError};
use crate::utils::serde_formats::{bool_flag, null_as_default, string_or_number};

/// A user-defined categorization tag.
///
/// `personal_use` is the label shown in pickers. The capability flags route
/// marked transactions into the asset, service, payroll and tax workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub internal_report: Option<String>,
    #[serde(default)]
    pub personal_use: Option<String>,
    #[serde(default)]
    pub tax_report: Option<String>,
    #[serde(default, deserialize_with = "bool_flag")]
    pub is_asset: bool,
    #[serde(default, deserialize_with = "bool_flag")]
    pub is_service: bool,
    #[serde(default, deserialize_with = "bool_flag")]
    pub is_salary: bool,
    #[serde(default, deserialize_with = "bool_flag")]
    pub is_tax: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mappings: Vec<MarkMappingSummary>,
}

impl Mark {
    pub fn label(&self) -> &str {
        self.personal_use
            .as_deref()
            .or(self.internal_report.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Account mapping summary the backend embeds in each mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkMappingSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub mapping_type: MappingType,
}

/// Payload for creating or updating a mark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkInput {
    pub internal_report: String,
    pub personal_use: String,
    pub tax_report: String,
}

impl MarkInput {
    pub fn validate(&self) -> Result<()> {
        if self.personal_use.trim().is_empty() && self.internal_report.trim().is_empty() {
            return Err(ValidationError::MissingField("personal_use".to_string()).into());
        }
        Ok(())
    }
}

/// Marks ordered case-insensitively by display label. Ties keep server order.
pub fn sort_marks_by_label(marks: &[Mark]) -> Vec<Mark> {
    let mut sorted = marks.to_vec();
    sorted.sort_by_cached_key(|m| {
        m.personal_use
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(id: &str, label: Option<&str>) -> Mark {
        Mark {
            id: id.into(),
            internal_report: None,
            personal_use: label.map(str::to_string),
            tax_report: None,
            is_asset: false,
            is_service: false,
            is_salary: false,
            is_tax: false,
            mappings: vec![],
        }
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let marks = vec![
            mark("1", Some("sewa")),
            mark("2", Some("Biaya Listrik")),
            mark("3", None),
            mark("4", Some(" Asuransi")),
        ];
        let ids: Vec<String> = sort_marks_by_label(&marks)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["3", "4", "2", "1"]);
    }

    #[test]
    fn test_deserializes_flags_and_mappings() {
        let parsed: Mark = serde_json::from_str(
            r#"{"id":"m1","personal_use":"Gaji","is_salary":1,"is_asset":0,
                "mappings":[{"code":"5201","name":"Beban Gaji","type":"DEBIT"}]}"#,
        )
        .unwrap();
        assert!(parsed.is_salary);
        assert!(!parsed.is_asset);
        assert_eq!(parsed.mappings[0].code, "5201");
        assert_eq!(parsed.label(), "Gaji");
    }
}
