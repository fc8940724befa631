//! Document picker runtime - request correlation between a script layer and
//! the host platform's file chooser.
//!
//! The host chooser is inherently asynchronous and crosses a process boundary:
//! a pick is requested synchronously, but the answer only arrives later, when
//! the chooser UI returns control. This crate implements the correlation core
//! that bridges the two sides:
//!
//! - **Pending request tracking**: the single outstanding pick, keyed by token
//! - **Result mapping**: translating the raw host outcome into the stable
//!   script-facing result shape
//! - **Coordination**: launching the chooser and completing the caller
//!   exactly once when the host answers
//!
//! # Architecture
//!
//! ```text
//! script layer ──► PickerBridge::request_pick ──► HostChooser (fire-and-forget)
//!                        │                              │
//!                        ▼                              ▼ (later)
//!                  PendingRequests ◄── PickerBridge::on_host_result
//!                        │                              │
//!                        └──► CompletionSink ◄── map_outcome
//! ```
//!
//! The host chooser and metadata lookup are external capabilities behind the
//! traits in [`host`]; tests substitute in-process fakes.

pub mod bridge;
pub mod completion;
pub mod error;
pub mod host;
pub mod mapper;
pub mod pending;

// Re-export key types at crate root
pub use bridge::{PickerBridge, PickerConfig};
pub use completion::{CompletionSink, OneshotCompletion};
pub use error::{PickError, Result};
pub use host::{
    DocumentMetadata, ForegroundContext, HostChooser, HostLaunchError, MetadataError,
    MetadataSource,
};
pub use mapper::{ChooserOutcome, map_outcome};
pub use pending::PendingRequests;
