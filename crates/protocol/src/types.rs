//! Script-facing result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Media type the default bridge configuration is constrained to.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A successfully picked document.
///
/// `name` and `size` are populated only when the host metadata lookup yields
/// them. An absent value is omitted from the wire entirely so that "unknown"
/// stays distinguishable from "known empty".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    /// Opaque location reference usable for later access.
    pub uri: String,
    /// Display name reported by the host, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// File size in bytes, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Media type of the document.
    #[serde(rename = "type")]
    pub media_type: String,
}

/// Stable error codes surfaced to the script layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No foreground context was available to launch the chooser.
    ActivityNotFound,
    /// The chooser failed to launch or returned an unusable result.
    DocumentPickerError,
    /// The user dismissed the chooser.
    DocumentPickerCancelled,
}

impl ErrorCode {
    /// String form of the code as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ActivityNotFound => "ACTIVITY_NOT_FOUND",
            ErrorCode::DocumentPickerError => "DOCUMENT_PICKER_ERROR",
            ErrorCode::DocumentPickerCancelled => "DOCUMENT_PICKER_CANCELLED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
