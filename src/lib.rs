//! # pdf2ar
//!
//! Translate PDF documents to Arabic Markdown using a streaming
//! generative-language API.
//!
//! ## Why this crate?
//!
//! Classic translation pipelines extract text first and translate second,
//! losing layout, tables, and figures along the way. This crate sends the
//! document itself — inline, base64 — to a multimodal generative model and
//! streams back Markdown that preserves the structure, with Arabic
//! image-description placeholders where figures were. Parsing, OCR, and
//! translation are all the model's problem; this crate is a careful client.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Validate  size ceiling (200 MB default) + application/pdf + magic
//!  ├─ 2. Snapshot  copy to a temp dir, released when the session ends
//!  ├─ 3. Encode    raw bytes → base64 inline payload
//!  ├─ 4. Stream    one streamGenerateContent request, SSE fragments
//!  ├─ 5. Session   FSM accumulates fragments, epoch-gates stale ones
//!  └─ 6. Output    <name>.ar.md artifact (only from a completed session)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2ar::{translate, TranslationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential from TranslationConfig::api_key or GEMINI_API_KEY
//!     let config = TranslationConfig::default();
//!     let output = translate("paper.pdf", &config).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("{} fragments in {}ms",
//!         output.stats.fragments,
//!         output.stats.duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2ar` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2ar = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;
pub mod stream;
pub mod translate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{TranslationConfig, TranslationConfigBuilder, DEFAULT_MAX_FILE_BYTES, PDF_MIME};
pub use error::TranslateError;
pub use output::{suggested_output_name, SourceFile, TranslationOutput, TranslationStats};
pub use pipeline::encode::EncodedDocument;
pub use pipeline::llm::{GeminiBackend, TranslationBackend};
pub use progress::{NoopProgressCallback, ProgressCallback, TranslationProgressCallback};
pub use session::{Session, SessionController, SessionStatus};
pub use stream::{translate_stream, translate_stream_bytes, FragmentStream};
pub use translate::{translate, translate_bytes, translate_to_file};
