//! Selection coordinator.
//!
//! The only component that talks to both the script layer and the host
//! platform. A pick request registers the caller's completion under the
//! bridge's request token and launches the chooser without waiting; the
//! host's eventual activity result is correlated back through the token and
//! completes the caller exactly once.
//!
//! # Message Flow
//!
//! 1. Script layer calls [`PickerBridge::request_pick`] (or awaits
//!    [`PickerBridge::pick_document`])
//! 2. The completion is registered in the pending-request tracker
//! 3. The chooser is presented via [`HostChooser::present`]; the call returns
//!    without waiting for a result
//! 4. The host later delivers [`PickerBridge::on_host_result`]
//! 5. The token is correlated, the outcome is built and mapped, and the
//!    retrieved completion is resolved or rejected

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use docpick_protocol::{
    ActivityResult, ChooserRequest, DocumentFile, PDF_MEDIA_TYPE, RequestToken,
};

use crate::completion::{CompletionSink, OneshotCompletion};
use crate::error::{PickError, Result};
use crate::host::{HostChooser, MetadataSource};
use crate::mapper::{ChooserOutcome, map_outcome};
use crate::pending::PendingRequests;

/// Configuration for a picker bridge instance.
#[derive(Debug, Clone)]
pub struct PickerConfig {
    /// MIME type the chooser is constrained to.
    pub media_type: String,
    /// Title shown on the chooser sheet.
    pub chooser_title: String,
    /// Correlation token the host echoes back with activity results.
    pub token: RequestToken,
    /// Deadline for [`PickerBridge::pick_document`]; `None` waits
    /// indefinitely, matching the host chooser's own lack of a timeout.
    pub deadline: Option<Duration>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            media_type: PDF_MEDIA_TYPE.to_string(),
            chooser_title: "Select PDF".to_string(),
            token: RequestToken::PICK_DOCUMENT,
            deadline: None,
        }
    }
}

/// Coordinates one in-flight document selection against the host chooser.
///
/// Owns the pending-request slot; constructed per embedding rather than held
/// as process-wide state, so independent bridges can coexist and tests can
/// build as many as they need.
pub struct PickerBridge {
    pending: PendingRequests,
    chooser: Arc<dyn HostChooser>,
    metadata: Arc<dyn MetadataSource>,
    config: PickerConfig,
}

impl PickerBridge {
    /// Creates a bridge with the default configuration (PDF documents,
    /// token 1001, no deadline).
    pub fn new(chooser: Arc<dyn HostChooser>, metadata: Arc<dyn MetadataSource>) -> Self {
        Self::with_config(chooser, metadata, PickerConfig::default())
    }

    pub fn with_config(
        chooser: Arc<dyn HostChooser>,
        metadata: Arc<dyn MetadataSource>,
        config: PickerConfig,
    ) -> Self {
        Self {
            pending: PendingRequests::new(),
            chooser,
            metadata,
            config,
        }
    }

    /// Requests a document pick on behalf of `completion`.
    ///
    /// Returns without waiting for the host: a registered completion is
    /// resolved later by [`PickerBridge::on_host_result`]. Every early-exit
    /// path rejects the completion before returning, so it is never left
    /// orphaned.
    pub fn request_pick(&self, completion: Box<dyn CompletionSink>) {
        let Some(context) = self.chooser.foreground_context() else {
            completion.reject(PickError::NoActiveContext);
            return;
        };

        if let Err(completion) = self.pending.begin(self.config.token, completion) {
            tracing::debug!(
                token = %self.config.token,
                "pick rejected: a request is already outstanding"
            );
            completion.reject(PickError::Busy);
            return;
        }

        let request = ChooserRequest {
            media_type: self.config.media_type.clone(),
            openable_only: true,
            title: self.config.chooser_title.clone(),
            token: self.config.token,
        };

        tracing::debug!(
            token = %self.config.token,
            media_type = %request.media_type,
            context = context.name(),
            "presenting chooser"
        );

        if let Err(err) = self.chooser.present(&context, &request) {
            // The slot was filled just above; take the entry back out before
            // rejecting the caller.
            if let Some(completion) = self.pending.take_if_matching(self.config.token) {
                completion.reject(PickError::LaunchFailed(err.to_string()));
            }
        }
    }

    /// Host callback entry point, invoked by the platform's activity-result
    /// channel.
    ///
    /// A delivery whose token has no pending entry is a stale or duplicate
    /// callback and is ignored: taking the entry out of the tracker is what
    /// makes completion exactly-once. Failures while building the result are
    /// converted into a rejection here; nothing propagates out of this
    /// callback, since the host channel has no other failure-reporting path.
    pub fn on_host_result(&self, token: RequestToken, result: ActivityResult) {
        let Some(completion) = self.pending.take_if_matching(token) else {
            tracing::debug!(%token, "ignoring host result with no pending request");
            return;
        };

        let mapped = panic::catch_unwind(AssertUnwindSafe(|| self.build_result(result)));

        match mapped {
            Ok(Ok(file)) => {
                tracing::debug!(%token, uri = %file.uri, "pick resolved");
                completion.resolve(file);
            }
            Ok(Err(err)) => {
                tracing::debug!(%token, error = %err, "pick rejected");
                completion.reject(err);
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::debug!(%token, %message, "panicked while building pick result");
                completion.reject(PickError::Internal(message));
            }
        }
    }

    /// Picks a document and awaits the host's answer.
    ///
    /// Async rendering of the script layer's promise-based entry point. With
    /// a configured deadline, a request the host never answers is rejected
    /// with [`PickError::Timeout`] and its slot cleared, so a late callback
    /// becomes a stale no-op.
    pub async fn pick_document(&self) -> Result<DocumentFile> {
        let (completion, rx) = OneshotCompletion::new();
        self.request_pick(completion);

        match self.config.deadline {
            None => rx.await.map_err(|_| dropped_without_completing())?,
            Some(deadline) => match tokio::time::timeout(deadline, rx).await {
                Ok(result) => result.map_err(|_| dropped_without_completing())?,
                Err(_) => {
                    self.pending.take_if_matching(self.config.token);
                    tracing::debug!(
                        token = %self.config.token,
                        "pick timed out waiting for host result"
                    );
                    Err(PickError::Timeout(deadline))
                }
            },
        }
    }

    /// Builds the script-facing result from the raw activity payload.
    ///
    /// Metadata lookup is best-effort: a failure downgrades the outcome to a
    /// handle without metadata, never to an operation failure.
    fn build_result(&self, result: ActivityResult) -> Result<DocumentFile> {
        let outcome = match result {
            ActivityResult { ok: false, .. } => ChooserOutcome::Cancelled,
            ActivityResult { ok: true, uri: None } => ChooserOutcome::NoSelection,
            ActivityResult {
                ok: true,
                uri: Some(uri),
            } => match self.metadata.metadata(&uri) {
                Ok(meta) => ChooserOutcome::Selected {
                    uri: Some(uri),
                    name: meta.name,
                    size: meta.size,
                },
                Err(err) => {
                    tracing::debug!(
                        uri = %uri,
                        error = %err,
                        "metadata lookup failed; continuing without metadata"
                    );
                    ChooserOutcome::MetadataUnavailable {
                        uri,
                        reason: err.to_string(),
                    }
                }
            },
        };

        map_outcome(outcome, &self.config.media_type)
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected panic while building pick result".to_string()
    }
}

fn dropped_without_completing() -> PickError {
    PickError::Internal("bridge dropped before completing the pick".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        DocumentMetadata, ForegroundContext, HostLaunchError, MetadataError, MetadataSource,
    };
    use parking_lot::Mutex;

    /// Host chooser fake: records presentations, optionally refuses them.
    #[derive(Default)]
    struct FakeChooser {
        has_context: bool,
        launch_error: Option<String>,
        presented: Mutex<Vec<ChooserRequest>>,
    }

    impl FakeChooser {
        fn with_context() -> Self {
            Self {
                has_context: true,
                ..Self::default()
            }
        }

        fn presented_count(&self) -> usize {
            self.presented.lock().len()
        }
    }

    impl HostChooser for FakeChooser {
        fn foreground_context(&self) -> Option<ForegroundContext> {
            self.has_context.then(|| ForegroundContext::new("main"))
        }

        fn present(
            &self,
            _context: &ForegroundContext,
            request: &ChooserRequest,
        ) -> std::result::Result<(), HostLaunchError> {
            match &self.launch_error {
                Some(message) => Err(HostLaunchError(message.clone())),
                None => {
                    self.presented.lock().push(request.clone());
                    Ok(())
                }
            }
        }
    }

    enum FakeMetadata {
        Known(DocumentMetadata),
        Failing,
        Panicking,
    }

    impl MetadataSource for FakeMetadata {
        fn metadata(&self, _uri: &str) -> std::result::Result<DocumentMetadata, MetadataError> {
            match self {
                FakeMetadata::Known(meta) => Ok(meta.clone()),
                FakeMetadata::Failing => Err(MetadataError("resolver unavailable".to_string())),
                FakeMetadata::Panicking => panic!("metadata lookup blew up"),
            }
        }
    }

    fn bridge(chooser: FakeChooser, metadata: FakeMetadata) -> PickerBridge {
        PickerBridge::new(Arc::new(chooser), Arc::new(metadata))
    }

    const TOKEN: RequestToken = RequestToken::PICK_DOCUMENT;

    #[test]
    fn selection_resolves_with_metadata() {
        let bridge = bridge(
            FakeChooser::with_context(),
            FakeMetadata::Known(DocumentMetadata {
                name: Some("a.pdf".to_string()),
                size: Some(1024),
            }),
        );

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);
        bridge.on_host_result(TOKEN, ActivityResult::ok("content://x"));

        let file = rx.try_recv().unwrap().unwrap();
        assert_eq!(file.uri, "content://x");
        assert_eq!(file.name.as_deref(), Some("a.pdf"));
        assert_eq!(file.size, Some(1024));
        assert_eq!(file.media_type, "application/pdf");
    }

    #[test]
    fn no_context_rejects_without_registering() {
        let bridge = bridge(
            FakeChooser::default(),
            FakeMetadata::Known(DocumentMetadata::default()),
        );

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);

        assert_eq!(rx.try_recv().unwrap(), Err(PickError::NoActiveContext));
        assert!(!bridge.pending.is_pending());
        // A later host delivery finds nothing to complete.
        bridge.on_host_result(TOKEN, ActivityResult::ok("content://x"));
    }

    #[test]
    fn launch_failure_clears_the_slot() {
        let bridge = bridge(
            FakeChooser {
                has_context: true,
                launch_error: Some("no compatible app".to_string()),
                ..FakeChooser::default()
            },
            FakeMetadata::Known(DocumentMetadata::default()),
        );

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);

        assert_eq!(
            rx.try_recv().unwrap(),
            Err(PickError::LaunchFailed("no compatible app".to_string()))
        );
        assert!(!bridge.pending.is_pending());
    }

    #[test]
    fn second_pick_while_outstanding_is_rejected_busy() {
        let chooser = FakeChooser::with_context();
        let bridge = bridge(chooser, FakeMetadata::Known(DocumentMetadata::default()));

        let (first, mut first_rx) = OneshotCompletion::new();
        bridge.request_pick(first);

        let (second, mut second_rx) = OneshotCompletion::new();
        bridge.request_pick(second);
        assert_eq!(second_rx.try_recv().unwrap(), Err(PickError::Busy));

        // The first request is unaffected and still completes.
        bridge.on_host_result(TOKEN, ActivityResult::cancelled());
        assert_eq!(first_rx.try_recv().unwrap(), Err(PickError::UserCancelled));
    }

    #[test]
    fn duplicate_host_result_is_a_no_op() {
        let bridge = bridge(
            FakeChooser::with_context(),
            FakeMetadata::Known(DocumentMetadata::default()),
        );

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);
        bridge.on_host_result(TOKEN, ActivityResult::cancelled());
        bridge.on_host_result(TOKEN, ActivityResult::ok("content://late"));

        // Exactly one completion was delivered.
        assert_eq!(rx.try_recv().unwrap(), Err(PickError::UserCancelled));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unknown_token_is_a_no_op() {
        let bridge = bridge(
            FakeChooser::with_context(),
            FakeMetadata::Known(DocumentMetadata::default()),
        );

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);
        bridge.on_host_result(RequestToken(42), ActivityResult::ok("content://x"));

        // Still pending: the mismatched delivery touched nothing.
        assert!(rx.try_recv().is_err());
        assert!(bridge.pending.is_pending());
    }

    #[test]
    fn metadata_failure_does_not_fail_the_pick() {
        let bridge = bridge(FakeChooser::with_context(), FakeMetadata::Failing);

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);
        bridge.on_host_result(TOKEN, ActivityResult::ok("content://x"));

        let file = rx.try_recv().unwrap().unwrap();
        assert_eq!(file.uri, "content://x");
        assert_eq!(file.name, None);
        assert_eq!(file.size, None);
    }

    #[test]
    fn panic_while_building_result_becomes_internal_rejection() {
        let bridge = bridge(FakeChooser::with_context(), FakeMetadata::Panicking);

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);
        bridge.on_host_result(TOKEN, ActivityResult::ok("content://x"));

        let err = rx.try_recv().unwrap().unwrap_err();
        assert_eq!(
            err,
            PickError::Internal("metadata lookup blew up".to_string())
        );
        assert_eq!(err.error_code().as_str(), "DOCUMENT_PICKER_ERROR");
        // The slot was consumed before the panic was caught.
        assert!(!bridge.pending.is_pending());
    }

    #[test]
    fn ok_without_handle_rejects_no_file_selected() {
        let bridge = bridge(
            FakeChooser::with_context(),
            FakeMetadata::Known(DocumentMetadata::default()),
        );

        let (sink, mut rx) = OneshotCompletion::new();
        bridge.request_pick(sink);
        bridge.on_host_result(TOKEN, ActivityResult::ok_without_handle());

        assert_eq!(rx.try_recv().unwrap(), Err(PickError::NoFileSelected));
    }

    #[test]
    fn chooser_request_carries_the_configured_constraints() {
        let chooser = Arc::new(FakeChooser::with_context());
        let bridge = PickerBridge::new(
            chooser.clone(),
            Arc::new(FakeMetadata::Known(DocumentMetadata::default())),
        );

        let (sink, _rx) = OneshotCompletion::new();
        bridge.request_pick(sink);

        let presented = chooser.presented.lock();
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].media_type, "application/pdf");
        assert_eq!(presented[0].title, "Select PDF");
        assert!(presented[0].openable_only);
        assert_eq!(presented[0].token, TOKEN);
    }

    #[test]
    fn new_pick_is_accepted_after_completion() {
        let chooser = Arc::new(FakeChooser::with_context());
        let bridge = PickerBridge::new(
            chooser.clone(),
            Arc::new(FakeMetadata::Known(DocumentMetadata::default())),
        );

        let (first, mut first_rx) = OneshotCompletion::new();
        bridge.request_pick(first);
        bridge.on_host_result(TOKEN, ActivityResult::cancelled());
        assert_eq!(first_rx.try_recv().unwrap(), Err(PickError::UserCancelled));

        let (second, mut second_rx) = OneshotCompletion::new();
        bridge.request_pick(second);
        bridge.on_host_result(TOKEN, ActivityResult::ok("content://y"));
        assert_eq!(
            second_rx.try_recv().unwrap().unwrap().uri,
            "content://y"
        );
        assert_eq!(chooser.presented_count(), 2);
    }
}
