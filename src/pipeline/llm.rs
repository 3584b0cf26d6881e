//! The translation client: one streaming request to the generative endpoint.
//!
//! This module is intentionally thin — the instruction text lives in
//! [`crate::prompts`] and stream decoding in [`crate::pipeline::sse`], so
//! request construction can change without touching either.
//!
//! There is no retry logic anywhere in this client. A failed or aborted
//! stream surfaces as an error; restarting is a user decision and always
//! begins again from byte zero.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::pipeline::encode::EncodedDocument;
use crate::pipeline::sse;
use crate::stream::FragmentStream;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A source of translated-text fragments.
///
/// The production implementation is [`GeminiBackend`]; tests inject scripted
/// implementations via [`TranslationConfig::backend`]. Opening the stream
/// performs the network call; dropping the returned stream cancels it.
pub trait TranslationBackend: Send + Sync {
    /// Open a single streaming translation request for `document`.
    ///
    /// Fragments are yielded in arrival order; the stream ends when the
    /// model is done. Errors before the first byte reject the future,
    /// errors mid-stream are yielded as `Err` items.
    fn open_stream(
        &self,
        document: EncodedDocument,
        prompt: String,
    ) -> BoxFuture<'static, Result<FragmentStream, TranslateError>>;
}

/// Resolve the backend, from most-specific to least-specific.
///
/// 1. **Pre-built backend** (`config.backend`) — the caller constructed it
///    entirely; used as-is. This is the test seam.
/// 2. **Configured or ambient credential** — [`GeminiBackend::new`] takes
///    `config.api_key`, falling back to the `GEMINI_API_KEY` environment
///    variable. Absence is reported here, before any network I/O.
pub(crate) fn resolve_backend(
    config: &TranslationConfig,
) -> Result<Arc<dyn TranslationBackend>, TranslateError> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }
    Ok(Arc::new(GeminiBackend::new(config)?))
}

// ── Request body ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// ── Production backend ───────────────────────────────────────────────────

/// Streaming client for the Gemini generate-content API.
#[derive(Debug)]
pub struct GeminiBackend {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl GeminiBackend {
    /// Build a backend from the config, resolving the credential.
    ///
    /// # Errors
    /// [`TranslateError::ApiKeyMissing`] when neither `config.api_key` nor
    /// `GEMINI_API_KEY` provides a non-empty key.
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or(TranslateError::ApiKeyMissing)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TranslateError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.api_base, self.model
        )
    }
}

impl TranslationBackend for GeminiBackend {
    fn open_stream(
        &self,
        document: EncodedDocument,
        prompt: String,
    ) -> BoxFuture<'static, Result<FragmentStream, TranslateError>> {
        let client = self.client.clone();
        let url = self.endpoint();
        let api_key = self.api_key.clone();
        let temperature = self.temperature;
        let max_output_tokens = self.max_output_tokens;

        Box::pin(async move {
            let request = GenerateRequest {
                contents: vec![RequestContent {
                    parts: vec![
                        RequestPart {
                            text: None,
                            inline_data: Some(InlineData {
                                mime_type: &document.mime_type,
                                data: &document.data,
                            }),
                        },
                        RequestPart {
                            text: Some(&prompt),
                            inline_data: None,
                        },
                    ],
                }],
                generation_config: GenerationConfig {
                    temperature,
                    max_output_tokens,
                },
            };

            info!("Opening translation stream: {}", url);
            let response = client
                .post(&url)
                .header("x-goog-api-key", &api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| TranslateError::ApiUnreachable {
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(TranslateError::ApiError {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!("Stream open (HTTP {})", status);
            let fragments = sse::sse_to_fragment_stream(response.bytes_stream());
            Ok(Box::pin(fragments) as FragmentStream)
        })
    }
}
