//! The session state machine: one upload-to-translation lifecycle.
//!
//! A [`SessionController`] owns exactly one live [`Session`] and is the only
//! code that mutates it. The machine has five states:
//!
//! ```text
//!                 start (file present)
//!        idle ───────────────▶ reading_file
//!         ▲                        │ encoding ok (text reset to empty)
//!         │ select file / reset    ▼
//!         │◀──── any state    translating ──▶ completed
//!         │                        │
//!         └──── any failure ──▶  error
//! ```
//!
//! There is no path back into `translating` except through
//! `idle → reading_file`: a retried translation starts over from byte zero.
//!
//! ## Stale fragments
//!
//! Reset is the only cancellation mechanism for an in-flight translation, so
//! fragments from a superseded attempt can still arrive afterwards. Every
//! session carries an epoch, bumped on each selection and reset; mutation
//! methods take the epoch token handed out by [`SessionController::start`]
//! and ignore calls whose token no longer matches. Cancellation is explicit
//! state, not closure identity.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::output::{SourceFile, TranslationOutput, TranslationStats};
use crate::pipeline::encode::{self, EncodedDocument};
use crate::pipeline::input::{self, FileHandle};
use crate::pipeline::llm;
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No translation running; a file may or may not be selected.
    Idle,
    /// Encoding the selected file.
    ReadingFile,
    /// Stream open, fragments accumulating.
    Translating,
    /// Stream finished successfully; the artifact is available.
    Completed,
    /// Something failed; the message is in [`Session::error`].
    Error,
}

/// Where the session's bytes come from.
enum SessionSource {
    /// Snapshot of a file on disk, released when the session is replaced.
    File(FileHandle),
    /// Caller-supplied bytes, already validated.
    Memory(Vec<u8>),
}

impl std::fmt::Debug for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionSource::File(handle) => write!(f, "File({})", handle.path().display()),
            SessionSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

/// One upload-to-translation cycle.
///
/// Created on file selection, replaced wholesale on reset, mutated in place
/// as fragments arrive. Read access only; all mutation goes through the
/// controller.
#[derive(Debug)]
pub struct Session {
    status: SessionStatus,
    file: Option<SourceFile>,
    source: Option<SessionSource>,
    translated: String,
    error: Option<String>,
    epoch: u64,
    started_at: Option<Instant>,
}

impl Session {
    fn empty(epoch: u64) -> Self {
        Self {
            status: SessionStatus::Idle,
            file: None,
            source: None,
            translated: String::new(),
            error: None,
            epoch,
            started_at: None,
        }
    }

    fn with_file(file: SourceFile, source: SessionSource, epoch: u64) -> Self {
        Self {
            file: Some(file),
            source: Some(source),
            ..Self::empty(epoch)
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn file(&self) -> Option<&SourceFile> {
        self.file.as_ref()
    }

    /// The accumulated translation. Non-decreasing in length while
    /// `translating`; retained after an error so hosts can keep showing it.
    pub fn translated(&self) -> &str {
        &self.translated
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The artifact is only offered once the stream completed.
    pub fn download_available(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

/// Owns the live session and drives its transitions.
pub struct SessionController {
    config: TranslationConfig,
    session: Session,
}

impl SessionController {
    pub fn new(config: TranslationConfig) -> Self {
        Self {
            config,
            session: Session::empty(0),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Validate `path` and, on acceptance, replace the session wholesale.
    ///
    /// On rejection the existing session is left untouched.
    pub async fn select_file(&mut self, path: &str) -> Result<(), TranslateError> {
        let (file, handle) = input::open_input(path, &self.config).await?;
        info!("Selected {} ({} bytes)", file.name, file.size);
        self.session = Session::with_file(
            file,
            SessionSource::File(handle),
            self.session.epoch + 1,
        );
        Ok(())
    }

    /// Validate in-memory bytes and, on acceptance, replace the session.
    pub fn select_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), TranslateError> {
        let file = input::validate_bytes(name, &bytes, self.config.max_file_bytes)?;
        info!("Selected {} ({} bytes, in memory)", file.name, file.size);
        self.session = Session::with_file(
            file,
            SessionSource::Memory(bytes),
            self.session.epoch + 1,
        );
        Ok(())
    }

    /// Return to `idle` with no file, empty text, and no error.
    ///
    /// Idempotent from any state. Bumps the epoch so fragments from any
    /// in-flight attempt are ignored, and drops the snapshot handle.
    pub fn reset(&mut self) {
        debug!("Session reset");
        self.session = Session::empty(self.session.epoch + 1);
    }

    /// Explicit start action: `idle → reading_file`, only if a file is
    /// present. Any other state, or no file, is a no-op returning `None`.
    ///
    /// The returned token authorises subsequent transitions for this
    /// attempt; it goes stale as soon as the session is replaced.
    pub fn start(&mut self) -> Option<u64> {
        if self.session.status != SessionStatus::Idle || self.session.file.is_none() {
            return None;
        }
        self.session.status = SessionStatus::ReadingFile;
        self.session.started_at = Some(Instant::now());
        if let (Some(cb), Some(file)) = (&self.config.progress_callback, &self.session.file) {
            cb.on_translation_start(&file.name, file.size);
        }
        Some(self.session.epoch)
    }

    /// `reading_file → translating` once encoding succeeded; resets the
    /// accumulated text to empty.
    pub fn begin_translating(&mut self, token: u64) -> bool {
        if token != self.session.epoch || self.session.status != SessionStatus::ReadingFile {
            return false;
        }
        self.session.status = SessionStatus::Translating;
        self.session.translated.clear();
        true
    }

    /// Append a fragment while `translating`. Stale or out-of-state calls
    /// are ignored.
    pub fn push_fragment(&mut self, token: u64, fragment: &str) -> bool {
        if token != self.session.epoch || self.session.status != SessionStatus::Translating {
            warn!("Ignoring stale fragment ({} bytes)", fragment.len());
            return false;
        }
        self.session.translated.push_str(fragment);
        if let Some(cb) = &self.config.progress_callback {
            cb.on_fragment(fragment.len(), self.session.translated.len());
        }
        true
    }

    /// `translating → completed` when the stream resolves. Returns the
    /// attempt duration, or `None` for a stale call.
    pub fn complete(&mut self, token: u64) -> Option<u64> {
        if token != self.session.epoch || self.session.status != SessionStatus::Translating {
            return None;
        }
        self.session.status = SessionStatus::Completed;
        let duration_ms = self
            .session
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        if let Some(cb) = &self.config.progress_callback {
            cb.on_translation_complete(self.session.translated.len(), duration_ms);
        }
        Some(duration_ms)
    }

    /// Any state → `error` with a message. The accumulated text is
    /// retained. Stale calls are ignored.
    pub fn fail(&mut self, token: u64, message: impl Into<String>) -> bool {
        if token != self.session.epoch {
            return false;
        }
        let message = message.into();
        warn!("Session failed: {message}");
        self.session.status = SessionStatus::Error;
        self.session.error = Some(message.clone());
        if let Some(cb) = &self.config.progress_callback {
            cb.on_translation_error(message);
        }
        true
    }

    /// Drive one full translation attempt to completion.
    ///
    /// Requires a selected file; resolves the backend (credential check)
    /// before touching the file, encodes, opens the stream, and accumulates
    /// fragments until the stream resolves. Every failure lands the session
    /// in `error` with the message, and is also returned to the caller.
    pub async fn run(&mut self) -> Result<TranslationOutput, TranslateError> {
        let Some(file) = self.session.file.clone() else {
            return Err(TranslateError::NoFileSelected);
        };
        let Some(token) = self.start() else {
            return Err(TranslateError::NoFileSelected);
        };

        let backend = match llm::resolve_backend(&self.config) {
            Ok(b) => b,
            Err(e) => {
                self.fail(token, e.to_string());
                return Err(e);
            }
        };

        let payload = match self.encode_source().await {
            Ok(p) => p,
            Err(e) => {
                self.fail(token, e.to_string());
                return Err(e);
            }
        };

        self.begin_translating(token);

        let prompt = self.config.prompt_text().to_string();
        let mut stream = match backend.open_stream(payload, prompt).await {
            Ok(s) => s,
            Err(e) => {
                self.fail(token, e.to_string());
                return Err(e);
            }
        };

        let mut fragments = 0usize;
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    if self.push_fragment(token, &fragment) {
                        fragments += 1;
                    }
                }
                Err(e) => {
                    self.fail(token, e.to_string());
                    return Err(e);
                }
            }
        }

        let Some(duration_ms) = self.complete(token) else {
            let e = TranslateError::StreamAborted {
                detail: "session was replaced mid-translation".into(),
            };
            return Err(e);
        };

        info!(
            "Translation complete: {} fragments, {} bytes, {}ms",
            fragments,
            self.session.translated.len(),
            duration_ms
        );

        Ok(TranslationOutput {
            markdown: self.session.translated.clone(),
            file,
            stats: TranslationStats {
                fragments,
                chars: self.session.translated.chars().count(),
                duration_ms,
            },
        })
    }

    async fn encode_source(&self) -> Result<EncodedDocument, TranslateError> {
        match &self.session.source {
            Some(SessionSource::File(handle)) => encode::encode_file(handle.path()).await,
            Some(SessionSource::Memory(bytes)) => Ok(encode::encode_bytes(bytes)),
            None => Err(TranslateError::NoFileSelected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\nendobj\n%%EOF\n";

    fn controller() -> SessionController {
        SessionController::new(TranslationConfig::default())
    }

    fn controller_with_file() -> SessionController {
        let mut c = controller();
        c.select_bytes("doc.pdf", TINY_PDF.to_vec()).unwrap();
        c
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let c = controller();
        assert_eq!(c.session().status(), SessionStatus::Idle);
        assert!(c.session().file().is_none());
        assert_eq!(c.session().translated(), "");
        assert!(!c.session().download_available());
    }

    #[test]
    fn start_without_file_is_a_no_op() {
        let mut c = controller();
        assert!(c.start().is_none());
        assert_eq!(c.session().status(), SessionStatus::Idle);
    }

    #[test]
    fn fragments_concatenate_in_arrival_order() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        assert!(c.begin_translating(token));

        assert!(c.push_fragment(token, "# Title\n"));
        assert!(c.push_fragment(token, "مرحبا "));
        assert!(c.push_fragment(token, "بالعالم"));
        assert_eq!(c.session().translated(), "# Title\nمرحبا بالعالم");

        assert!(c.complete(token).is_some());
        assert_eq!(c.session().status(), SessionStatus::Completed);
        assert!(c.session().download_available());
    }

    #[test]
    fn translated_length_is_non_decreasing_while_translating() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        c.begin_translating(token);

        let mut last = 0;
        for fragment in ["a", "", "bc", "د"] {
            c.push_fragment(token, fragment);
            let len = c.session().translated().len();
            assert!(len >= last);
            last = len;
        }
    }

    #[test]
    fn reset_is_idempotent_from_any_state() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        c.begin_translating(token);
        c.push_fragment(token, "partial");

        for _ in 0..3 {
            c.reset();
            assert_eq!(c.session().status(), SessionStatus::Idle);
            assert!(c.session().file().is_none());
            assert_eq!(c.session().translated(), "");
            assert!(c.session().error().is_none());
        }
    }

    #[test]
    fn stale_fragments_after_reset_are_ignored() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        c.begin_translating(token);
        c.push_fragment(token, "early");

        c.reset();
        c.select_bytes("other.pdf", TINY_PDF.to_vec()).unwrap();

        // Fragments from the superseded attempt must not touch the new session.
        assert!(!c.push_fragment(token, "late"));
        assert!(!c.fail(token, "late error"));
        assert!(c.complete(token).is_none());
        assert_eq!(c.session().translated(), "");
        assert_eq!(c.session().status(), SessionStatus::Idle);
    }

    #[test]
    fn failure_retains_partial_text_and_blocks_download() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        c.begin_translating(token);
        c.push_fragment(token, "جزء أول");

        assert!(c.fail(token, "stream error: connection reset"));
        assert_eq!(c.session().status(), SessionStatus::Error);
        assert_eq!(c.session().translated(), "جزء أول");
        assert!(c.session().error().unwrap().contains("connection reset"));
        assert!(!c.session().download_available());
    }

    #[test]
    fn no_reentry_into_translating_without_restart() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        c.begin_translating(token);
        c.complete(token);

        // From completed, start is a no-op; so is a second begin_translating.
        assert!(c.start().is_none());
        assert!(!c.begin_translating(token));
        assert_eq!(c.session().status(), SessionStatus::Completed);
    }

    #[test]
    fn selecting_a_new_file_replaces_a_completed_session() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        c.begin_translating(token);
        c.push_fragment(token, "نص");
        c.complete(token);

        c.select_bytes("next.pdf", TINY_PDF.to_vec()).unwrap();
        assert_eq!(c.session().status(), SessionStatus::Idle);
        assert_eq!(c.session().translated(), "");
        assert_eq!(c.session().file().unwrap().name, "next.pdf");
    }

    #[test]
    fn rejected_selection_leaves_session_untouched() {
        let mut c = controller_with_file();
        let err = c.select_bytes("notes.txt", b"plain text".to_vec()).unwrap_err();
        assert!(err.to_string().contains("wrong type"));
        assert_eq!(c.session().file().unwrap().name, "doc.pdf");
        assert_eq!(c.session().status(), SessionStatus::Idle);
    }

    #[test]
    fn begin_translating_clears_prior_text() {
        let mut c = controller_with_file();
        let token = c.start().unwrap();
        c.begin_translating(token);
        c.push_fragment(token, "first attempt");
        c.fail(token, "boom");

        // Restart: re-select the same file, then start over.
        c.select_bytes("doc.pdf", TINY_PDF.to_vec()).unwrap();
        let token2 = c.start().unwrap();
        assert!(c.begin_translating(token2));
        assert_eq!(c.session().translated(), "");
    }
}
