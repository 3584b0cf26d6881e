//! Integration tests driving full translation sessions against scripted
//! in-process backends. No network, no credentials — the backend seam in
//! `TranslationConfig` is the injection point.

use futures::future::BoxFuture;
use pdf2ar::{
    translate, translate_bytes, translate_to_file, EncodedDocument, FragmentStream,
    SessionController, SessionStatus, TranslateError, TranslationBackend, TranslationConfig,
};
use std::path::PathBuf;
use std::sync::Arc;

const TINY_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\nendobj\ntrailer\n%%EOF\n";

// ── Test backends ────────────────────────────────────────────────────────────

/// Yields a fixed script of fragments; `Err` entries abort the stream with
/// that detail mid-transmission.
struct ScriptedBackend {
    script: Vec<Result<String, String>>,
}

impl ScriptedBackend {
    fn fragments(fragments: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            script: fragments.iter().map(|f| Ok((*f).to_string())).collect(),
        })
    }
}

impl TranslationBackend for ScriptedBackend {
    fn open_stream(
        &self,
        _document: EncodedDocument,
        _prompt: String,
    ) -> BoxFuture<'static, Result<FragmentStream, TranslateError>> {
        let script = self.script.clone();
        Box::pin(async move {
            let items = script
                .into_iter()
                .map(|item| item.map_err(|detail| TranslateError::StreamAborted { detail }));
            Ok(Box::pin(futures::stream::iter(items)) as FragmentStream)
        })
    }
}

/// Rejects the request before any fragment is produced.
struct RefusingBackend;

impl TranslationBackend for RefusingBackend {
    fn open_stream(
        &self,
        _document: EncodedDocument,
        _prompt: String,
    ) -> BoxFuture<'static, Result<FragmentStream, TranslateError>> {
        Box::pin(async move {
            Err(TranslateError::ApiError {
                status: 503,
                message: "model overloaded".into(),
            })
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_pdf(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

fn config_with(backend: Arc<dyn TranslationBackend>) -> TranslationConfig {
    TranslationConfig::builder().backend(backend).build().unwrap()
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn fragments_concatenate_in_arrival_order() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "doc.pdf", TINY_PDF);

    let config = config_with(ScriptedBackend::fragments(&["# Title\n", "مرحبا ", "بالعالم"]));
    let output = translate(pdf.to_str().unwrap(), &config).await.unwrap();

    assert_eq!(output.markdown, "# Title\nمرحبا بالعالم");
    assert_eq!(output.stats.fragments, 3);
    assert_eq!(output.file.name, "doc.pdf");
    assert_eq!(output.file.mime, "application/pdf");
}

#[tokio::test]
async fn empty_stream_still_completes() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "blank.pdf", TINY_PDF);

    let config = config_with(ScriptedBackend::fragments(&[]));
    let output = translate(pdf.to_str().unwrap(), &config).await.unwrap();

    assert_eq!(output.markdown, "");
    assert_eq!(output.stats.fragments, 0);
}

#[tokio::test]
async fn translate_bytes_needs_no_file() {
    let config = config_with(ScriptedBackend::fragments(&["نص مترجم"]));
    let output = translate_bytes("report.pdf", TINY_PDF, &config).await.unwrap();

    assert_eq!(output.markdown, "نص مترجم");
    assert_eq!(output.file.name, "report.pdf");
}

#[tokio::test]
async fn translate_to_file_writes_artifact_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "doc.pdf", TINY_PDF);
    let out = dir.path().join("out").join("doc.ar.md");

    let config = config_with(ScriptedBackend::fragments(&["# عنوان\n", "فقرة"]));
    let stats = translate_to_file(pdf.to_str().unwrap(), &out, &config)
        .await
        .unwrap();

    assert_eq!(stats.fragments, 2);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "# عنوان\nفقرة");
    // Atomic write must leave no temp file behind.
    assert!(!out.with_extension("md.tmp").exists());
}

// ── Validation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn oversized_file_is_rejected_and_session_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "big.pdf", TINY_PDF);

    let config = TranslationConfig::builder()
        .backend(ScriptedBackend::fragments(&["unused"]))
        .max_file_bytes(8)
        .build()
        .unwrap();

    let mut controller = SessionController::new(config);
    let err = controller.select_file(pdf.to_str().unwrap()).await.unwrap_err();

    assert!(err.to_string().contains("too large"), "got: {err}");
    assert_eq!(controller.session().status(), SessionStatus::Idle);
    assert!(controller.session().file().is_none());
}

#[tokio::test]
async fn non_pdf_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let txt = write_pdf(&dir, "notes.txt", b"just some notes");

    let config = config_with(ScriptedBackend::fragments(&["unused"]));
    let err = translate(txt.to_str().unwrap(), &config).await.unwrap_err();

    assert!(err.to_string().contains("wrong type"), "got: {err}");
}

#[tokio::test]
async fn pdf_extension_with_bad_magic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let fake = write_pdf(&dir, "fake.pdf", b"<html>not a pdf</html>");

    let config = config_with(ScriptedBackend::fragments(&["unused"]));
    let err = translate(fake.to_str().unwrap(), &config).await.unwrap_err();

    assert!(matches!(err, TranslateError::NotAPdf { .. }));
}

// ── Precondition ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_credential_is_reported_before_any_network_call() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "doc.pdf", TINY_PDF);

    std::env::remove_var("GEMINI_API_KEY");
    let config = TranslationConfig::default();

    let mut controller = SessionController::new(config);
    controller.select_file(pdf.to_str().unwrap()).await.unwrap();
    let err = controller.run().await.unwrap_err();

    assert!(err.to_string().contains("API Key"), "got: {err}");
    assert_eq!(controller.session().status(), SessionStatus::Error);
    assert!(controller.session().error().unwrap().contains("API Key"));
}

// ── Remote failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn mid_stream_failure_retains_partial_text_and_offers_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "doc.pdf", TINY_PDF);

    let backend = Arc::new(ScriptedBackend {
        script: vec![Ok("الجزء الأول".to_string()), Err("connection reset".to_string())],
    });

    let mut controller = SessionController::new(config_with(backend));
    controller.select_file(pdf.to_str().unwrap()).await.unwrap();
    let err = controller.run().await.unwrap_err();

    assert!(matches!(err, TranslateError::StreamAborted { .. }));
    assert_eq!(controller.session().status(), SessionStatus::Error);
    assert_eq!(controller.session().translated(), "الجزء الأول");
    assert!(!controller.session().download_available());
}

#[tokio::test]
async fn refused_request_lands_in_error_state() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "doc.pdf", TINY_PDF);

    let mut controller = SessionController::new(config_with(Arc::new(RefusingBackend)));
    controller.select_file(pdf.to_str().unwrap()).await.unwrap();
    let err = controller.run().await.unwrap_err();

    assert!(err.to_string().contains("model overloaded"));
    assert_eq!(controller.session().status(), SessionStatus::Error);
    assert_eq!(controller.session().translated(), "");
}

#[tokio::test]
async fn retry_after_failure_starts_from_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir, "doc.pdf", TINY_PDF);
    let path = pdf.to_str().unwrap();

    let failing = Arc::new(ScriptedBackend {
        script: vec![Ok("جزء".to_string()), Err("boom".to_string())],
    });
    let mut controller = SessionController::new(config_with(failing));
    controller.select_file(path).await.unwrap();
    controller.run().await.unwrap_err();
    assert_eq!(controller.session().translated(), "جزء");

    // User-triggered retry: re-select the same file, start over.
    let working = ScriptedBackend::fragments(&["ترجمة ", "كاملة"]);
    let mut controller = SessionController::new(config_with(working));
    controller.select_file(path).await.unwrap();
    let output = controller.run().await.unwrap();

    assert_eq!(output.markdown, "ترجمة كاملة");
    assert!(controller.session().download_available());
}
