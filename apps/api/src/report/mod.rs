//! Report rendering — one candidate evaluation in, three artifacts out.
//!
//! HTML is the canonical representation; the PDF is printed from it, the
//! DOCX is built independently from the same record. Filenames embed the
//! sanitized candidate name and a render timestamp so repeated runs for the
//! same candidate never collide.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::evaluation::CandidateEvaluation;

pub mod docx;
pub mod html;
pub mod pdf;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render engine failure: {0}")]
    Engine(String),

    #[error("render timed out after {0:?}")]
    Timeout(Duration),

    #[error("DOCX build failed: {0}")]
    Docx(String),

    #[error("failed to write report artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// The three rendered artifacts for one candidate, on local disk.
#[derive(Debug, Clone)]
pub struct ReportArtifactSet {
    pub candidate_name: String,
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
    pub docx_path: PathBuf,
}

impl ReportArtifactSet {
    pub fn paths(&self) -> [&Path; 3] {
        [&self.html_path, &self.pdf_path, &self.docx_path]
    }

    /// Deletes the local artifact files. Best-effort: the files may already
    /// be gone, and a leftover artifact is an operator annoyance, not a
    /// correctness problem.
    pub async fn remove_local_files(&self) {
        for path in self.paths() {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("failed to remove report artifact {}: {e}", path.display());
            }
        }
    }
}

/// Reduces a candidate name to a filesystem- and key-safe token.
pub fn sanitize_candidate_name(name: &str) -> String {
    if name.trim().is_empty() {
        return "Unknown".to_string();
    }
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

/// ISO instant with `:` and `.` replaced so it can live in a filename.
pub fn render_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

pub fn report_basename(candidate_name: &str, timestamp: &str) -> String {
    format!(
        "skill_evaluation_{}_{}",
        sanitize_candidate_name(candidate_name),
        timestamp
    )
}

/// Renders all three artifacts for one candidate into `output_dir`.
pub async fn render_reports(
    evaluation: &CandidateEvaluation,
    output_dir: &Path,
    pdf_renderer: &pdf::PdfRenderer,
) -> Result<ReportArtifactSet, RenderError> {
    tokio::fs::create_dir_all(output_dir).await?;

    let base = report_basename(&evaluation.candidate_name, &render_timestamp());

    let html = html::render_html(evaluation);
    let html_path = output_dir.join(format!("{base}.html"));
    tokio::fs::write(&html_path, &html).await?;

    let pdf_bytes = pdf_renderer.render(&html).await?;
    let pdf_path = output_dir.join(format!("{base}.pdf"));
    tokio::fs::write(&pdf_path, &pdf_bytes).await?;

    let docx_bytes = docx::render_docx(evaluation)?;
    let docx_path = output_dir.join(format!("{base}.docx"));
    tokio::fs::write(&docx_path, &docx_bytes).await?;

    debug!(
        candidate = %evaluation.candidate_name,
        "rendered report artifacts under {}", output_dir.display()
    );

    Ok(ReportArtifactSet {
        candidate_name: evaluation.candidate_name.clone(),
        html_path,
        pdf_path,
        docx_path,
    })
}
