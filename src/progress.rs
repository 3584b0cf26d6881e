//! Progress-callback trait for translation lifecycle events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslationConfigBuilder::progress_callback`] to receive
//! an event for every state change and every streamed fragment. This is the
//! seam a host UI hangs its re-rendering off: a GUI repaints the translated
//! pane on each `on_fragment`, the CLI updates its spinner, a web backend
//! forwards the event over a WebSocket. The library knows nothing about how
//! the host communicates.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about.

use std::sync::Arc;

/// Called by the session as a translation progresses.
///
/// Implementations must be `Send + Sync`; the session may be driven from a
/// spawned task.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called once when the session leaves `idle` and starts reading the file.
    fn on_translation_start(&self, file_name: &str, file_bytes: u64) {
        let _ = (file_name, file_bytes);
    }

    /// Called once per streamed fragment, after it has been appended.
    ///
    /// # Arguments
    /// * `fragment_bytes` — byte length of the fragment just appended
    /// * `total_bytes`    — byte length of the accumulated translation so far
    fn on_fragment(&self, fragment_bytes: usize, total_bytes: usize) {
        let _ = (fragment_bytes, total_bytes);
    }

    /// Called once when the stream finishes and the session completes.
    fn on_translation_complete(&self, total_bytes: usize, duration_ms: u64) {
        let _ = (total_bytes, duration_ms);
    }

    /// Called once when the session enters the error state.
    fn on_translation_error(&self, message: String) {
        let _ = message;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        fragments: AtomicUsize,
        completed_bytes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl TranslationProgressCallback for TrackingCallback {
        fn on_fragment(&self, _fragment_bytes: usize, _total_bytes: usize) {
            self.fragments.fetch_add(1, Ordering::SeqCst);
        }

        fn on_translation_complete(&self, total_bytes: usize, _duration_ms: u64) {
            self.completed_bytes.store(total_bytes, Ordering::SeqCst);
        }

        fn on_translation_error(&self, _message: String) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_translation_start("doc.pdf", 1024);
        cb.on_fragment(5, 5);
        cb.on_translation_complete(5, 120);
        cb.on_translation_error("boom".to_string());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            fragments: AtomicUsize::new(0),
            completed_bytes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        };

        cb.on_translation_start("doc.pdf", 2048);
        cb.on_fragment(3, 3);
        cb.on_fragment(4, 7);
        cb.on_translation_complete(7, 900);

        assert_eq!(cb.fragments.load(Ordering::SeqCst), 2);
        assert_eq!(cb.completed_bytes.load(Ordering::SeqCst), 7);
        assert_eq!(cb.errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn arc_dyn_callback_is_send() {
        let cb: Arc<dyn TranslationProgressCallback> = Arc::new(NoopProgressCallback);
        std::thread::spawn(move || {
            cb.on_fragment(1, 1);
        })
        .join()
        .unwrap();
    }
}
