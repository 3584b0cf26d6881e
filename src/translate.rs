//! Eager (full-document) translation entry points.
//!
//! This module provides the simpler API: drive a whole session lifecycle
//! internally and return only after the stream resolves. Use
//! [`crate::stream::translate_stream`] instead when fragments should be
//! consumed (or cancelled) as they arrive, or [`crate::session`] directly
//! when the host owns its own event loop.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::output::{TranslationOutput, TranslationStats};
use crate::session::SessionController;
use std::path::Path;
use tracing::info;

/// Translate a local PDF file to Arabic Markdown.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any of the validation, precondition, I/O, or remote failures in
/// [`TranslateError`]; the session this call drives internally ends in the
/// error state with the same message.
pub async fn translate(
    input: impl AsRef<str>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    let input = input.as_ref();
    info!("Starting translation: {}", input);

    let mut controller = SessionController::new(config.clone());
    controller.select_file(input).await?;
    controller.run().await
}

/// Translate PDF bytes already in memory.
///
/// `name` is used for validation (declared type) and artifact naming; no
/// temp file is created.
pub async fn translate_bytes(
    name: &str,
    bytes: &[u8],
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    let mut controller = SessionController::new(config.clone());
    controller.select_bytes(name, bytes.to_vec())?;
    controller.run().await
}

/// Translate a PDF and write the Markdown artifact to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn translate_to_file(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationStats, TranslateError> {
    let output = translate(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TranslateError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.markdown)
        .await
        .map_err(|e| TranslateError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| TranslateError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}
