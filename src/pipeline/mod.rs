//! Pipeline stages for one translation session.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. point at a different provider) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ llm ──▶ sse
//! (validate) (base64)  (HTTP)  (fragments)
//! ```
//!
//! 1. [`input`]  — validate the candidate file (ceiling, MIME, magic bytes)
//!    and snapshot it so the read source stays stable
//! 2. [`encode`] — read the bytes and base64-wrap them for the inline request
//!    body
//! 3. [`llm`]    — open the single streaming request; the only stage with
//!    network I/O
//! 4. [`sse`]    — decode the SSE byte stream into ordered text fragments

pub mod encode;
pub mod input;
pub mod llm;
pub mod sse;
