//! Pending request tracking.
//!
//! A token-keyed map from request token to the caller's completion sink.
//! Only one entry is ever live, but the explicit map keeps the
//! "exactly once, ignore stale" rule visible: once an entry is taken, the
//! same token yields nothing on a second delivery.

use std::collections::HashMap;

use docpick_protocol::RequestToken;
use parking_lot::Mutex;

use crate::completion::CompletionSink;

/// Tracks the single outstanding pick request.
///
/// Pure state; no I/O. The internal mutex serializes `begin` and
/// `take_if_matching` regardless of which host execution context each side
/// runs on.
#[derive(Default)]
pub struct PendingRequests {
    entries: Mutex<HashMap<RequestToken, Box<dyn CompletionSink>>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `completion` as the sole pending entry under `token`.
    ///
    /// At most one request may be outstanding: if the slot is occupied the
    /// completion is handed back unconsumed so the caller can reject it.
    /// The previous entry is never overwritten.
    pub fn begin(
        &self,
        token: RequestToken,
        completion: Box<dyn CompletionSink>,
    ) -> std::result::Result<(), Box<dyn CompletionSink>> {
        let mut entries = self.entries.lock();
        if !entries.is_empty() {
            return Err(completion);
        }
        entries.insert(token, completion);
        Ok(())
    }

    /// Removes and returns the pending completion iff `token` matches.
    ///
    /// The single point of exactly-once enforcement: a duplicate or stale
    /// delivery finds the slot empty and gets `None`.
    pub fn take_if_matching(&self, token: RequestToken) -> Option<Box<dyn CompletionSink>> {
        self.entries.lock().remove(&token)
    }

    /// Returns true if a request is outstanding.
    pub fn is_pending(&self) -> bool {
        !self.entries.lock().is_empty()
    }
}
