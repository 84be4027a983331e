//! PDF backend. pdf-extract is CPU-bound and has been known to panic on
//! malformed files, so the call runs on the blocking pool where a panic is
//! contained in the JoinError and degrades to the placeholder.

use std::path::Path;

use tracing::error;

pub const PDF_READ_ERROR: &str = "Error reading PDF file";

pub(super) async fn extract(path: &Path) -> String {
    let path = path.to_owned();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)).await;

    match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!("Error extracting PDF text: {e}");
            PDF_READ_ERROR.to_string()
        }
        Err(e) => {
            error!("PDF extraction task panicked: {e}");
            PDF_READ_ERROR.to_string()
        }
    }
}
