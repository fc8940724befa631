//! Result mapping.
//!
//! Pure translation from a chooser outcome to the script-facing result.
//! No I/O: the coordinator performs the metadata lookup and hands the
//! assembled outcome here.

use docpick_protocol::DocumentFile;

use crate::error::PickError;

/// Outcome of one chooser round-trip, as assembled by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserOutcome {
    /// Host returned a handle; metadata fields hold whatever the lookup gave.
    Selected {
        uri: Option<String>,
        name: Option<String>,
        size: Option<u64>,
    },
    /// Host reported OK but handed back no handle.
    NoSelection,
    /// User dismissed the chooser.
    Cancelled,
    /// A handle was returned but the metadata lookup failed. The pick still
    /// succeeds, with name and size absent.
    MetadataUnavailable { uri: String, reason: String },
}

/// Maps a chooser outcome to the script-facing result.
///
/// `media_type` is the bridge's configured document type, stamped on every
/// successful result.
pub fn map_outcome(outcome: ChooserOutcome, media_type: &str) -> Result<DocumentFile, PickError> {
    match outcome {
        ChooserOutcome::Selected {
            uri: Some(uri),
            name,
            size,
        } => Ok(DocumentFile {
            uri,
            name,
            size,
            media_type: media_type.to_string(),
        }),
        ChooserOutcome::Selected { uri: None, .. } | ChooserOutcome::NoSelection => {
            Err(PickError::NoFileSelected)
        }
        ChooserOutcome::Cancelled => Err(PickError::UserCancelled),
        ChooserOutcome::MetadataUnavailable { uri, .. } => Ok(DocumentFile {
            uri,
            name: None,
            size: None,
            media_type: media_type.to_string(),
        }),
    }
}
