//! Host platform seams.
//!
//! The operating system's chooser presentation and metadata lookup are
//! external capabilities behind narrow traits, keeping the runtime free of
//! platform bindings and letting tests substitute in-process fakes.

use docpick_protocol::ChooserRequest;
use thiserror::Error;

/// Handle to the host's current foreground context.
///
/// Opaque to the bridge: its existence is the precondition for launching the
/// chooser, and the handle is passed straight back to
/// [`HostChooser::present`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundContext {
    name: String,
}

impl ForegroundContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Host-specific identifier, useful in logs.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Synchronous refusal from the host when presenting the chooser
/// (e.g. no application can handle the request).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HostLaunchError(pub String);

/// Optional metadata for a content handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Display name, if the host reports one.
    pub name: Option<String>,
    /// Size in bytes, if the host reports one.
    pub size: Option<u64>,
}

/// Failure to look up metadata for a content handle.
///
/// Recovered by the coordinator: the pick still succeeds with metadata
/// absent. Never surfaced as an operation failure.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MetadataError(pub String);

/// The host's file chooser capability.
pub trait HostChooser: Send + Sync {
    /// Returns the current foreground context, if one is available.
    fn foreground_context(&self) -> Option<ForegroundContext>;

    /// Presents the system chooser constrained to `request`.
    ///
    /// Fire-and-forget: a successful return only means the chooser was
    /// launched. The outcome arrives later through the host callback channel
    /// as an activity result tagged with the request token.
    fn present(
        &self,
        context: &ForegroundContext,
        request: &ChooserRequest,
    ) -> std::result::Result<(), HostLaunchError>;
}

/// The host's metadata lookup capability.
pub trait MetadataSource: Send + Sync {
    /// Looks up display name and size for a content handle.
    fn metadata(&self, uri: &str) -> std::result::Result<DocumentMetadata, MetadataError>;
}
