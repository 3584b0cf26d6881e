//! Configuration for a translation session.
//!
//! All behaviour is controlled through [`TranslationConfig`], built via its
//! [`TranslationConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across entry points and to substitute a fake
//! backend or credential in tests.
//!
//! The API credential is an explicit configuration value, not an ambient
//! read: [`TranslationConfig::api_key`] takes precedence, the
//! `GEMINI_API_KEY` environment variable is the fallback, and absence is a
//! surfaced error rather than a crash.

use crate::error::TranslateError;
use crate::pipeline::llm::TranslationBackend;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Default size ceiling for accepted files: 200 MB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 200 * 1024 * 1024;

/// The only content type the validator accepts.
pub const PDF_MIME: &str = "application/pdf";

/// Configuration for a PDF-to-Arabic translation.
///
/// Built via [`TranslationConfig::builder()`] or
/// [`TranslationConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2ar::TranslationConfig;
///
/// let config = TranslationConfig::builder()
///     .model("gemini-2.5-flash")
///     .max_file_bytes(50 * 1024 * 1024)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// Maximum accepted input size in bytes. Default: 200 MB.
    ///
    /// The whole document is sent inline (base64) in a single request body,
    /// so the ceiling bounds both memory use and what the remote endpoint
    /// will realistically accept.
    pub max_file_bytes: u64,

    /// Generative model identifier. Default: `gemini-2.5-flash`.
    pub model: String,

    /// Base URL of the generative-language API. Default: the public
    /// Google endpoint. Override for proxies and self-hosted gateways.
    pub api_base: String,

    /// Explicit API credential. When `None`, the `GEMINI_API_KEY`
    /// environment variable is consulted at backend construction time.
    pub api_key: Option<String>,

    /// Pre-constructed backend. Takes precedence over `api_key`; this is
    /// the test seam for injecting scripted streams.
    pub backend: Option<Arc<dyn TranslationBackend>>,

    /// Custom instruction text. If `None`, uses
    /// [`crate::prompts::DEFAULT_TRANSLATION_PROMPT`].
    pub prompt: Option<String>,

    /// Sampling temperature for the model. Default: 0.2.
    ///
    /// Translation wants faithfulness, not creativity; low temperature keeps
    /// the model close to the source text.
    pub temperature: f32,

    /// Cap on generated tokens. `None` leaves the provider default in place.
    pub max_output_tokens: Option<u32>,

    /// HTTP connect timeout in seconds. Default: 30.
    ///
    /// Applies to connection establishment only — the response stream itself
    /// stays open as long as fragments keep arriving.
    pub connect_timeout_secs: u64,

    /// Suffix inserted into the output artifact name. Default: `"ar"`.
    pub language_suffix: String,

    /// Progress events for host UIs. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            model: "gemini-2.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            backend: None,
            prompt: None,
            temperature: 0.2,
            max_output_tokens: None,
            connect_timeout_secs: 30,
            language_suffix: "ar".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("max_file_bytes", &self.max_file_bytes)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("backend", &self.backend.as_ref().map(|_| "<dyn TranslationBackend>"))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("language_suffix", &self.language_suffix)
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }

    /// The instruction text to send: the configured override, or the default.
    pub fn prompt_text(&self) -> &str {
        self.prompt
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_TRANSLATION_PROMPT)
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn backend(mut self, backend: Arc<dyn TranslationBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = Some(n);
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs.max(1);
        self
    }

    pub fn language_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.language_suffix = suffix.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, TranslateError> {
        let c = &self.config;
        if c.max_file_bytes == 0 {
            return Err(TranslateError::InvalidConfig(
                "Size ceiling must be ≥ 1 byte".into(),
            ));
        }
        if c.model.is_empty() {
            return Err(TranslateError::InvalidConfig("Model must be set".into()));
        }
        if c.language_suffix.is_empty() {
            return Err(TranslateError::InvalidConfig(
                "Language suffix must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
