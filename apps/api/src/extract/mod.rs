//! Text extraction — turns an uploaded document into plain text.
//!
//! Dispatch is purely by file extension. Backend failures NEVER propagate:
//! a corrupt file degrades to a human-readable placeholder so one bad
//! document cannot abort the whole submission. The cause is logged for
//! operators.

use std::path::Path;

pub mod doc;
pub mod docx;
pub mod pdf;

/// Returned for extensions outside the supported set. Deliberately a normal
/// result, not an error — the pipeline keeps going.
pub const UNSUPPORTED_FORMAT: &str = "Unsupported file format";

/// Plain-text content of one uploaded file, paired with its original name.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub filename: String,
    pub content: String,
}

/// Lowercased extension of `name`, without the leading dot.
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Extracts plain text from the stored file at `path`, dispatching on the
/// extension of `original_name` (the stored path carries a mangled name).
pub async fn extract_text(path: &Path, original_name: &str) -> String {
    match file_extension(original_name).as_deref() {
        Some("pdf") => pdf::extract(path).await,
        Some("docx") => docx::extract(path).await,
        Some("doc") => doc::extract(path).await,
        _ => UNSUPPORTED_FORMAT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_extension_is_case_insensitive() {
        assert_eq!(file_extension("Resume.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("cv.Docx").as_deref(), Some("docx"));
        assert_eq!(file_extension("notes"), None);
    }

    #[tokio::test]
    async fn test_unknown_extension_yields_unsupported_marker() {
        let text = extract_text(Path::new("/nonexistent"), "resume.txt").await;
        assert_eq!(text, UNSUPPORTED_FORMAT);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_degrades_to_placeholder() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();
        let text = extract_text(file.path(), "broken.pdf").await;
        assert_eq!(text, pdf::PDF_READ_ERROR);
    }

    #[tokio::test]
    async fn test_corrupt_docx_degrades_to_placeholder() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        let text = extract_text(file.path(), "broken.docx").await;
        assert_eq!(text, docx::DOCX_READ_ERROR);
    }
}
