//! Input validation and the snapshot handle.
//!
//! ## Why snapshot the file?
//!
//! A translation can run for minutes while the user keeps working. Copying
//! the accepted file into a private temp directory gives the encoder a
//! stable byte source even if the original is overwritten mid-flight, and
//! gives embedding hosts a path they can display or preview from. The
//! `TempDir` inside [`FileHandle`] is the release mechanism: dropping the
//! handle (session reset, file replaced, session end) deletes the snapshot,
//! so the resource cannot leak past the session that owns it.

use crate::config::{TranslationConfig, PDF_MIME};
use crate::error::TranslateError;
use crate::output::SourceFile;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// A validated input file, pinned by a temp-dir snapshot.
///
/// The snapshot is deleted when the handle is dropped.
pub struct FileHandle {
    path: PathBuf,
    _snapshot_dir: TempDir,
}

impl FileHandle {
    /// Path of the snapshot copy.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle").field("path", &self.path).finish()
    }
}

/// Declared content type of a file name, by extension.
pub fn declared_mime(name: &str) -> String {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MIME,
        "txt" => "text/plain",
        "md" => "text/markdown",
        "doc" | "docx" => "application/msword",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// The validation decision: accept only files within the ceiling whose
/// declared type is exactly `application/pdf`.
///
/// Pure — no file system access, no side effects — so the size property is
/// testable without multi-hundred-megabyte fixtures.
pub fn validate(name: &str, size: u64, mime: &str, ceiling: u64) -> Result<(), TranslateError> {
    if size > ceiling {
        return Err(TranslateError::FileTooLarge {
            name: name.to_string(),
            size,
            limit: ceiling,
        });
    }
    if mime != PDF_MIME {
        return Err(TranslateError::UnsupportedType {
            name: name.to_string(),
            mime: mime.to_string(),
        });
    }
    Ok(())
}

/// Validate in-memory bytes as a PDF candidate.
pub fn validate_bytes(
    name: &str,
    bytes: &[u8],
    ceiling: u64,
) -> Result<SourceFile, TranslateError> {
    let mime = declared_mime(name);
    validate(name, bytes.len() as u64, &mime, ceiling)?;

    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(TranslateError::NotAPdf {
            path: PathBuf::from(name),
            magic,
        });
    }

    Ok(SourceFile {
        name: name.to_string(),
        size: bytes.len() as u64,
        mime,
    })
}

/// Validate a file on disk and snapshot it.
///
/// On rejection the caller's session must be left untouched; this function
/// has no side effects beyond creating the snapshot on acceptance.
pub async fn open_input(
    path_str: &str,
    config: &TranslationConfig,
) -> Result<(SourceFile, FileHandle), TranslateError> {
    let path = PathBuf::from(path_str);

    let meta = match std::fs::metadata(&path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => return Err(TranslateError::FileNotFound { path }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TranslateError::PermissionDenied { path });
        }
        Err(_) => return Err(TranslateError::FileNotFound { path }),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_str.to_string());
    let mime = declared_mime(&name);
    validate(&name, meta.len(), &mime, config.max_file_bytes)?;

    // Verify PDF magic bytes before accepting.
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(TranslateError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TranslateError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(TranslateError::FileNotFound { path });
        }
    }

    let snapshot_dir = TempDir::new().map_err(|e| TranslateError::ReadFailed {
        path: path.clone(),
        source: e,
    })?;
    let snapshot_path = snapshot_dir.path().join(&name);
    tokio::fs::copy(&path, &snapshot_path)
        .await
        .map_err(|e| TranslateError::ReadFailed {
            path: path.clone(),
            source: e,
        })?;

    debug!("Accepted {} ({} bytes), snapshot at {}", name, meta.len(), snapshot_path.display());

    Ok((
        SourceFile {
            name,
            size: meta.len(),
            mime,
        },
        FileHandle {
            path: snapshot_path,
            _snapshot_dir: snapshot_dir,
        },
    ))
}
