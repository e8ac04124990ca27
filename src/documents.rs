use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::ranking::ResumeDocument;

/// Best-effort plain text from a `.txt` or `.pdf` file; empty string on any failure.
pub fn extract_text_from_file(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("txt") => match std::fs::read(path) {
            Ok(bytes) => {
                info!("Extracted text from TXT: {:?}", path);
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Err(e) => {
                error!("Error extracting text from {:?}: {}", path, e);
                String::new()
            }
        },
        // pdf-extract can panic on malformed documents
        Some("pdf") => match std::panic::catch_unwind(|| pdf_extract::extract_text(path)) {
            Ok(Ok(text)) => {
                info!("Extracted text from PDF: {:?}", path);
                text
            }
            Ok(Err(e)) => {
                error!("Error extracting text from {:?}: {}", path, e);
                String::new()
            }
            Err(_) => {
                error!("PDF parser panicked on {:?}", path);
                String::new()
            }
        },
        _ => {
            error!("Unsupported file type: {:?}", path);
            String::new()
        }
    }
}

/// The file name has an extension in `allowed_extensions` (case-insensitive).
pub fn allowed_file(name: &str, allowed_extensions: &[String]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extract every allowed file concurrently, preserving input order.
pub async fn load_documents(paths: &[PathBuf], allowed_extensions: &[String]) -> Vec<ResumeDocument> {
    let tasks = paths
        .iter()
        .filter(|path| {
            let name = display_name(path);
            let allowed = allowed_file(&name, allowed_extensions);
            if !allowed {
                warn!("Skipping {}: file type not allowed", name);
            }
            allowed
        })
        .cloned()
        .map(|path| async move {
            let name = display_name(&path);
            let text = tokio::task::spawn_blocking(move || extract_text_from_file(&path))
                .await
                .unwrap_or_else(|e| {
                    error!("Text extraction task failed: {}", e);
                    String::new()
                });
            ResumeDocument { name, text }
        });

    join_all(tasks).await
}
