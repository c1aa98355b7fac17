//! Wire types shared by several gateway call groups.

use serde::{Deserialize, Serialize};

use crate::utils::serde_formats::option_string_or_number;

/// Opaque JSON body for reports and records whose layout is owned by the
/// backend.
pub type ReportPayload = serde_json::Value;

/// Acknowledgement returned by mutating endpoints.
///
/// The backend answers `{"message": ...}`, `{"success": true}` or
/// `{"id": ..., "message": ...}` depending on the route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

/// Raw binary response of an export endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobResponse {
    pub bytes: Vec<u8>,
    /// Value of the `content-disposition` header, when the backend sent one.
    pub content_disposition: Option<String>,
}
