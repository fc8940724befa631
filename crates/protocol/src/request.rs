//! Host-facing request and callback payload types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlation token tying a chooser presentation to its eventual callback.
///
/// Fixed per bridge instance and echoed back by the host with the activity
/// result; deliveries carrying any other token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(pub u32);

impl RequestToken {
    /// Token used by the default bridge configuration.
    pub const PICK_DOCUMENT: RequestToken = RequestToken(1001);
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for one chooser presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChooserRequest {
    /// MIME type the chooser is constrained to.
    pub media_type: String,
    /// Restrict the chooser to sources that can actually be opened.
    pub openable_only: bool,
    /// Title shown on the chooser sheet.
    pub title: String,
    /// Token the host must echo back with the result.
    pub token: RequestToken,
}

/// Raw activity-result payload delivered by the host callback channel.
///
/// `ok` mirrors the host's OK-equivalent result flag; `uri` is the opaque
/// content handle, present only when the host returned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl ActivityResult {
    /// OK result carrying a content handle.
    pub fn ok(uri: impl Into<String>) -> Self {
        Self {
            ok: true,
            uri: Some(uri.into()),
        }
    }

    /// OK result without a usable handle.
    pub fn ok_without_handle() -> Self {
        Self { ok: true, uri: None }
    }

    /// Chooser was dismissed without a selection.
    pub fn cancelled() -> Self {
        Self {
            ok: false,
            uri: None,
        }
    }
}
