//! The instruction sent to the generative model alongside the document.
//!
//! The prompt is configuration, not logic: it is an opaque contract with the
//! remote model and lives here so changing the translation behaviour means
//! editing exactly one place. Callers can override it via
//! [`crate::config::TranslationConfig::prompt`]; the constant is used only
//! when no override is provided.

/// Default instruction for translating a PDF to Arabic Markdown.
pub const DEFAULT_TRANSLATION_PROMPT: &str = r#"You are an expert document translator. Your task is to translate the attached PDF document from English to Arabic and output the result as clean, well-structured Markdown.

Follow these rules precisely:

1. TRANSLATION
   - Translate ALL textual content into Modern Standard Arabic
   - Keep proper nouns, code identifiers, URLs, and citations in their original script
   - Do not summarise, omit, or reorder content

2. STRUCTURE
   - Preserve the document structure: headings, lists, tables, block quotes
   - Use # for the document title, ## for major sections, ### for subsections
   - Convert tables to GFM pipe format
   - Use **bold** and *italic* to match the original emphasis

3. IMAGES AND FIGURES
   - For every image, figure, or diagram, insert a placeholder of the form
     ![وصف الصورة](#) followed by a one-sentence Arabic description of its content
   - Do not attempt to reproduce the image itself

4. OUTPUT FORMAT
   - Output ONLY the translated Markdown content
   - Do NOT wrap the output in ```markdown fences
   - Do NOT add commentary, notes, or explanations
   - Start directly with the document content"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_targets_arabic_markdown() {
        assert!(DEFAULT_TRANSLATION_PROMPT.contains("Arabic"));
        assert!(DEFAULT_TRANSLATION_PROMPT.contains("Markdown"));
    }
}
