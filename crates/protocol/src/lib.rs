//! Wire types for the document picker bridge.
//!
//! This crate contains the serde-serializable types that cross the bridge's
//! two external boundaries: the script-facing result shape and the host
//! activity-result payload.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **Stable**: Field names and error code strings are a cross-boundary
//!   contract and change only when the wire contract changes
//!
//! The correlation machinery that moves these shapes around lives in
//! `docpick-runtime`.

pub mod request;
pub mod types;

pub use request::*;
pub use types::*;
