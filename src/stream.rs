//! Streaming translation API: consume fragments as they arrive.
//!
//! ## Why stream?
//!
//! A long document takes minutes to translate. The stream-based API lets
//! callers display partial output immediately and gives them true
//! cancellation: the fragment sequence is lazy, finite, and
//! non-restartable, and dropping it tears down the underlying request.
//! This is strictly stronger than ignoring stale callbacks after a reset —
//! the session layer still epoch-gates for hosts that need that model, but
//! stream consumers get cancellation for free.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::pipeline::{encode, input, llm};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of translated-text fragments, in arrival order.
///
/// Ends when the model finishes; yields `Err` exactly once on an abnormal
/// termination. Dropping the stream cancels the in-flight request.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, TranslateError>> + Send>>;

/// Open a streaming translation of a local PDF file.
///
/// Validates and encodes eagerly (so validation and credential errors
/// reject this call, before any fragment), then opens the remote stream.
///
/// # Example
/// ```rust,no_run
/// use pdf2ar::{translate_stream, TranslationConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TranslationConfig::default();
/// let mut fragments = translate_stream("paper.pdf", &config).await?;
/// while let Some(fragment) = fragments.next().await {
///     print!("{}", fragment?);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn translate_stream(
    input_str: impl AsRef<str>,
    config: &TranslationConfig,
) -> Result<FragmentStream, TranslateError> {
    let input_str = input_str.as_ref();
    info!("Starting streaming translation: {}", input_str);

    let backend = llm::resolve_backend(config)?;
    let (file, handle) = input::open_input(input_str, config).await?;
    let payload = encode::encode_file(handle.path()).await?;
    // The payload is fully in memory; the snapshot can go.
    drop(handle);

    info!("Streaming {} ({} bytes)", file.name, file.size);
    backend
        .open_stream(payload, config.prompt_text().to_string())
        .await
}

/// Streaming variant of [`crate::translate::translate_bytes`].
pub async fn translate_stream_bytes(
    name: &str,
    bytes: &[u8],
    config: &TranslationConfig,
) -> Result<FragmentStream, TranslateError> {
    let backend = llm::resolve_backend(config)?;
    let file = input::validate_bytes(name, bytes, config.max_file_bytes)?;
    let payload = encode::encode_bytes(bytes);

    info!("Streaming {} ({} bytes, in memory)", file.name, file.size);
    backend
        .open_stream(payload, config.prompt_text().to_string())
        .await
}
