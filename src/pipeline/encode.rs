//! Payload encoding: file bytes → base64 for the inline request body.
//!
//! The remote API accepts documents as base64 data embedded in the JSON
//! request. Encoding is async because the read may suspend on storage; a
//! failed read (revoked snapshot, I/O fault) surfaces as a rejected
//! operation, never a silent empty payload.

use crate::config::PDF_MIME;
use crate::error::TranslateError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// A document ready for transmission.
#[derive(Debug, Clone)]
pub struct EncodedDocument {
    /// Base64 of the raw file bytes.
    pub data: String,
    /// Content type forwarded to the API.
    pub mime_type: String,
}

/// Read a file and encode it for the request body.
pub async fn encode_file(path: &Path) -> Result<EncodedDocument, TranslateError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| TranslateError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(encode_bytes(&bytes))
}

/// Encode in-memory bytes for the request body.
pub fn encode_bytes(bytes: &[u8]) -> EncodedDocument {
    let data = STANDARD.encode(bytes);
    debug!("Encoded document → {} bytes base64", data.len());
    EncodedDocument {
        data,
        mime_type: PDF_MIME.to_string(),
    }
}
