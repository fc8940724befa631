//! Error types for the picker runtime.

use std::time::Duration;

use docpick_protocol::ErrorCode;
use thiserror::Error;

/// Result type alias for picker operations.
pub type Result<T> = std::result::Result<T, PickError>;

/// Failures surfaced to the script layer.
///
/// Every variant maps onto one of the three stable error code strings via
/// [`PickError::error_code`]; the `Display` form is the message half of the
/// code/message pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    /// No foreground context was available to launch the chooser.
    #[error("Activity not found")]
    NoActiveContext,

    /// The host refused or failed to start the chooser.
    #[error("{0}")]
    LaunchFailed(String),

    /// The user dismissed the chooser.
    #[error("User cancelled")]
    UserCancelled,

    /// The chooser reported success but handed back no usable handle.
    #[error("No file selected")]
    NoFileSelected,

    /// A pick was requested while another is still outstanding.
    #[error("Pick already in progress")]
    Busy,

    /// Unexpected failure while building the result.
    #[error("Internal picker error: {0}")]
    Internal(String),

    /// No host callback arrived within the configured deadline.
    #[error("Timed out after {}ms waiting for chooser result", .0.as_millis())]
    Timeout(Duration),
}

impl PickError {
    /// Stable code for this failure on the script boundary.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            PickError::NoActiveContext => ErrorCode::ActivityNotFound,
            PickError::UserCancelled => ErrorCode::DocumentPickerCancelled,
            PickError::LaunchFailed(_)
            | PickError::NoFileSelected
            | PickError::Busy
            | PickError::Internal(_)
            | PickError::Timeout(_) => ErrorCode::DocumentPickerError,
        }
    }

    /// Returns true if the user dismissed the chooser.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PickError::UserCancelled)
    }

    /// Returns true if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PickError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_mapping_is_stable() {
        assert_eq!(
            PickError::NoActiveContext.error_code().as_str(),
            "ACTIVITY_NOT_FOUND"
        );
        assert_eq!(
            PickError::UserCancelled.error_code().as_str(),
            "DOCUMENT_PICKER_CANCELLED"
        );
        for err in [
            PickError::LaunchFailed("no compatible app".to_string()),
            PickError::NoFileSelected,
            PickError::Busy,
            PickError::Internal("boom".to_string()),
            PickError::Timeout(Duration::from_secs(30)),
        ] {
            assert_eq!(err.error_code().as_str(), "DOCUMENT_PICKER_ERROR");
        }
    }

    #[test]
    fn messages_match_script_contract() {
        assert_eq!(PickError::NoActiveContext.to_string(), "Activity not found");
        assert_eq!(PickError::UserCancelled.to_string(), "User cancelled");
        assert_eq!(PickError::NoFileSelected.to_string(), "No file selected");
    }
}
