//! Completion sinks - the script runtime's promise primitive.
//!
//! The script layer hands the bridge a one-shot completion when it requests a
//! pick; the bridge resolves or rejects it exactly once when the host answers.
//! Both methods consume the sink, so a sink cannot complete twice.

use docpick_protocol::DocumentFile;
use tokio::sync::oneshot;

use crate::error::PickError;

/// One-shot completion handle for an outstanding pick.
///
/// Exclusively owned by the pending-request tracker while the pick is
/// outstanding, and handed over exactly once on completion. Rejection carries
/// a [`PickError`], which embeds the stable code/message pair; an embedding
/// that needs the raw strings uses [`PickError::error_code`] and `Display`.
pub trait CompletionSink: Send {
    /// Resolve the pick with the selected document.
    fn resolve(self: Box<Self>, file: DocumentFile);

    /// Reject the pick with a typed failure.
    fn reject(self: Box<Self>, error: PickError);
}

/// Completion sink backed by a tokio oneshot channel.
///
/// This is what `PickerBridge::pick_document` awaits; callback-style
/// embeddings supply their own [`CompletionSink`] instead.
pub struct OneshotCompletion {
    tx: oneshot::Sender<crate::error::Result<DocumentFile>>,
}

impl OneshotCompletion {
    /// Creates a sink and the receiver that observes its completion.
    pub fn new() -> (
        Box<Self>,
        oneshot::Receiver<crate::error::Result<DocumentFile>>,
    ) {
        let (tx, rx) = oneshot::channel();
        (Box::new(Self { tx }), rx)
    }
}

impl CompletionSink for OneshotCompletion {
    fn resolve(self: Box<Self>, file: DocumentFile) {
        // Send fails only if the caller stopped waiting; nothing to report.
        let _ = self.tx.send(Ok(file));
    }

    fn reject(self: Box<Self>, error: PickError) {
        let _ = self.tx.send(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docpick_protocol::PDF_MEDIA_TYPE;

    #[test]
    fn resolve_reaches_the_receiver() {
        let (sink, mut rx) = OneshotCompletion::new();
        sink.resolve(DocumentFile {
            uri: "content://x".to_string(),
            name: None,
            size: None,
            media_type: PDF_MEDIA_TYPE.to_string(),
        });

        let result = rx.try_recv().unwrap().unwrap();
        assert_eq!(result.uri, "content://x");
    }

    #[test]
    fn reject_reaches_the_receiver() {
        let (sink, mut rx) = OneshotCompletion::new();
        sink.reject(PickError::UserCancelled);

        let result = rx.try_recv().unwrap();
        assert_eq!(result, Err(PickError::UserCancelled));
    }

    #[test]
    fn completing_after_receiver_dropped_is_silent() {
        let (sink, rx) = OneshotCompletion::new();
        drop(rx);
        sink.reject(PickError::UserCancelled);
    }
}
