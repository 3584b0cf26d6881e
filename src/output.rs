//! Output types and artifact naming.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata of the file a session is translating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name as selected (no directory component).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared content type, derived from the file extension.
    pub mime: String,
}

/// Counters for one completed translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationStats {
    /// Number of non-empty fragments received from the stream.
    pub fragments: usize,
    /// Unicode scalar count of the accumulated translation.
    pub chars: usize,
    /// Wall-clock time from start action to stream completion.
    pub duration_ms: u64,
}

/// The result of a successful translation.
///
/// Only a session that reached `completed` produces one of these; a failed
/// session retains its partial text internally but offers no artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutput {
    /// The full translated Markdown document.
    pub markdown: String,
    /// The file it was translated from.
    pub file: SourceFile,
    pub stats: TranslationStats,
}

/// Name for the output artifact: extension stripped, language suffix
/// appended, `.md` extension.
///
/// `"paper.pdf"` → `"paper.ar.md"`; a name without an extension keeps its
/// full stem.
pub fn suggested_output_name(original: &str, language_suffix: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| original.to_string());
    format!("{stem}.{language_suffix}.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_strips_extension_and_appends_suffix() {
        assert_eq!(suggested_output_name("paper.pdf", "ar"), "paper.ar.md");
    }

    #[test]
    fn output_name_keeps_inner_dots() {
        assert_eq!(
            suggested_output_name("archive.v2.pdf", "ar"),
            "archive.v2.ar.md"
        );
    }

    #[test]
    fn output_name_without_extension() {
        assert_eq!(suggested_output_name("document", "ar"), "document.ar.md");
    }

    #[test]
    fn output_roundtrips_through_json() {
        let out = TranslationOutput {
            markdown: "# عنوان\n".to_string(),
            file: SourceFile {
                name: "doc.pdf".into(),
                size: 42,
                mime: "application/pdf".into(),
            },
            stats: TranslationStats {
                fragments: 1,
                chars: 7,
                duration_ms: 10,
            },
        };
        let json = serde_json::to_string(&out).unwrap();
        let back: TranslationOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.markdown, out.markdown);
        assert_eq!(back.stats.fragments, 1);
    }
}
