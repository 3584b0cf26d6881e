//! Server-Sent Events decoding for the streaming translation response.
//!
//! The endpoint answers `streamGenerateContent?alt=sse` with a sequence of
//! `data: {json}` lines, each carrying zero or more text parts. This module
//! turns the raw byte stream into a stream of non-empty text fragments in
//! arrival order, handling chunk boundaries that split lines.

use crate::error::TranslateError;
use bytes::Bytes;
use futures::Stream;
use serde::Deserialize;

/// One SSE payload from the generate-content stream.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Converts a raw SSE byte stream into a stream of text fragments.
///
/// Buffers partial lines across chunk boundaries; empty fragments and
/// non-data lines are skipped. A transport error terminates the stream
/// after yielding the error.
pub fn sse_to_fragment_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, TranslateError>> + Send {
    async_stream::stream! {
        use futures::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(TranslateError::StreamAborted {
                        detail: e.to_string(),
                    });
                    return;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(line_end) = buffer.find('\n') {
                let line: String = buffer.drain(..=line_end).collect();

                if let Some(fragment) = parse_sse_line(line.trim()) {
                    yield Ok(fragment);
                }
            }
        }

        // The last event may arrive without a trailing newline.
        if let Some(fragment) = parse_sse_line(buffer.trim()) {
            yield Ok(fragment);
        }
    }
}

/// Parses a single SSE line and extracts the fragment text.
///
/// Returns `None` for non-data lines, empty fragments, and payloads that do
/// not parse (keep-alive comments, usage-metadata-only events).
fn parse_sse_line(line: &str) -> Option<String> {
    let json_str = line.strip_prefix("data: ")?;

    let response = serde_json::from_str::<StreamResponse>(json_str).ok()?;

    let text: String = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .filter(|t| !t.is_empty())
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
