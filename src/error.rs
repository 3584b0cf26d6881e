//! Error types for the pdf2ar library.
//!
//! The variants map one-to-one onto the four failure classes a translation
//! session can hit:
//!
//! * **Validation** — the candidate file is too large or not a PDF. The user
//!   recovers by selecting a different file; the existing session is never
//!   modified by a rejected selection.
//! * **Precondition** — no API credential is configured. Reported before any
//!   network I/O is attempted.
//! * **I/O** — the file cannot be read/encoded, or the output artifact cannot
//!   be written.
//! * **Remote** — the API call failed or the stream terminated abnormally.
//!   Never retried automatically; a user-triggered retry restarts the stream
//!   from byte zero.
//!
//! All of them are surfaced to session hosts as an `error` status carrying
//! the rendered message; none are fatal to the embedding application.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2ar library.
#[derive(Debug, Error)]
pub enum TranslateError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exceeds the configured size ceiling.
    #[error("File is too large: '{name}' is {size} bytes, ceiling is {limit} bytes\nRaise --max-size-mb if the document really is this big.")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// The declared content type is not `application/pdf`.
    #[error("File is the wrong type: '{name}' is {mime}, expected application/pdf")]
    UnsupportedType { name: String, mime: String },

    /// The file claims to be a PDF but the magic bytes disagree.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Precondition errors ───────────────────────────────────────────────
    /// No credential available through any of the configured sources.
    #[error("API Key is not configured.\nPass --api-key, set TranslationConfig::api_key, or export GEMINI_API_KEY.")]
    ApiKeyMissing,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Reading or encoding the input file failed mid-operation.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// The endpoint could not be reached at all.
    #[error("Failed to reach translation endpoint: {reason}\nCheck your internet connection.")]
    ApiUnreachable { reason: String },

    /// The API answered with a non-success status.
    #[error("Translation API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response stream broke before the model finished.
    #[error("Translation stream ended abnormally: {detail}")]
    StreamAborted { detail: String },

    // ── Config / usage errors ─────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A translation was started with no file in the session.
    #[error("No file selected; nothing to translate")]
    NoFileSelected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_display_mentions_too_large() {
        let e = TranslateError::FileTooLarge {
            name: "big.pdf".into(),
            size: 262_144_000,
            limit: 209_715_200,
        };
        let msg = e.to_string();
        assert!(msg.contains("too large"), "got: {msg}");
        assert!(msg.contains("big.pdf"));
    }

    #[test]
    fn wrong_type_display_mentions_wrong_type() {
        let e = TranslateError::UnsupportedType {
            name: "notes.txt".into(),
            mime: "text/plain".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("wrong type"), "got: {msg}");
        assert!(msg.contains("text/plain"));
    }

    #[test]
    fn api_key_missing_display_mentions_api_key() {
        let msg = TranslateError::ApiKeyMissing.to_string();
        assert!(msg.contains("API Key"), "got: {msg}");
    }

    #[test]
    fn api_error_display() {
        let e = TranslateError::ApiError {
            status: 429,
            message: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("quota exceeded"));
    }
}
