//! Pipeline Orchestrator — drives one submission through
//! extract → summarize → render → upload and assembles the per-candidate
//! result list.
//!
//! Failure isolation is the core design rule here: anything that goes wrong
//! for one resume (AI call, rendering, upload) is recorded against that
//! candidate only and never aborts the siblings. The final list always has
//! one entry per resume, in upload order. Temp files are removed on every
//! terminal path.

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::ai_client::prompts::build_prompt;
use crate::extract::{extract_text, ExtractedDocument};
use crate::pipeline::intake::Submission;
use crate::report::{render_reports, ReportArtifactSet};
use crate::state::AppState;
use crate::storage::{
    generate_key, upload_file, UploadError, JOB_DESCRIPTIONS_PREFIX, REPORTS_PREFIX,
    RESUMES_PREFIX,
};

pub mod handlers;
pub mod intake;

/// Durable storage URLs for one candidate's three artifacts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUrls {
    pub html: String,
    pub pdf: String,
    pub docx: String,
}

/// Outcome for one resume. A failed entry is never dropped from the list;
/// it carries the error instead of the URLs.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CandidateReport {
    #[serde(rename_all = "camelCase")]
    Succeeded {
        candidate_name: String,
        s3_files: ReportUrls,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        candidate_name: String,
        error: String,
        success: bool,
    },
}

impl CandidateReport {
    fn failed(candidate_name: String, error: String) -> Self {
        CandidateReport::Failed {
            candidate_name,
            error,
            success: false,
        }
    }
}

/// Consolidated response for one submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub submission_id: Uuid,
    pub reports: Vec<CandidateReport>,
}

/// Runs the full pipeline for one validated submission. The stored upload
/// copies are removed before returning, whatever happened in between.
pub async fn process_submission(state: &AppState, submission: Submission) -> UploadResponse {
    let response = run_pipeline(state, &submission).await;
    submission.cleanup().await;
    response
}

async fn run_pipeline(state: &AppState, submission: &Submission) -> UploadResponse {
    // Validated → Extracted. Extraction degrades to placeholder text on
    // failure; it never fails the submission.
    let jd_text = extract_text(
        &submission.job_description.path,
        &submission.job_description.original_name,
    )
    .await;

    let mut documents = Vec::with_capacity(submission.resumes.len());
    for file in &submission.resumes {
        let content = extract_text(&file.path, &file.original_name).await;
        documents.push(ExtractedDocument {
            filename: file.original_name.clone(),
            content,
        });
    }
    info!(
        submission = %submission.id,
        resumes = documents.len(),
        "text extraction complete"
    );

    archive_sources(state, submission).await;

    // Extracted → Summarized → Rendered → Uploaded, one resume at a time.
    // Result order mirrors upload order.
    let mut reports = Vec::with_capacity(documents.len());
    for document in &documents {
        reports.push(process_resume(state, &jd_text, document).await);
    }

    let failed = reports
        .iter()
        .filter(|r| matches!(r, CandidateReport::Failed { .. }))
        .count();
    info!(
        submission = %submission.id,
        succeeded = reports.len() - failed,
        failed,
        "submission complete"
    );

    UploadResponse {
        success: true,
        submission_id: submission.id,
        reports,
    }
}

/// Archives the uploaded source files under their stable prefixes.
/// Best-effort: the reports are the deliverable, not the source copies, so
/// an archival failure is logged and ignored.
async fn archive_sources(state: &AppState, submission: &Submission) {
    let jd = &submission.job_description;
    let key = generate_key(&jd.original_name, JOB_DESCRIPTIONS_PREFIX);
    if let Err(e) = upload_source(state, &jd.path, &key).await {
        warn!("failed to archive job description {}: {e}", jd.original_name);
    }

    for resume in &submission.resumes {
        let key = generate_key(&resume.original_name, RESUMES_PREFIX);
        if let Err(e) = upload_source(state, &resume.path, &key).await {
            warn!("failed to archive resume {}: {e}", resume.original_name);
        }
    }
}

async fn upload_source(
    state: &AppState,
    path: &std::path::Path,
    key: &str,
) -> Result<String, UploadError> {
    upload_file(
        &state.s3,
        &state.config.s3_bucket,
        &state.config.aws_region,
        path,
        key,
    )
    .await
}

/// One resume end to end: prompt → AI → render → upload. Every failure is
/// converted into a Failed entry for this candidate only.
async fn process_resume(
    state: &AppState,
    jd_text: &str,
    document: &ExtractedDocument,
) -> CandidateReport {
    // Until the AI names the candidate, the resume filename is the best
    // label a failure can carry.
    let fallback_name = std::path::Path::new(&document.filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&document.filename)
        .to_string();

    let prompt = build_prompt(jd_text, std::slice::from_ref(document));

    let evaluations = match state.ai.generate(&prompt).await {
        Ok(evaluations) => evaluations,
        Err(e) => {
            error!(resume = %document.filename, "AI generation failed: {e}");
            return CandidateReport::failed(fallback_name, e.to_string());
        }
    };

    if evaluations.len() > 1 {
        warn!(
            resume = %document.filename,
            count = evaluations.len(),
            "AI returned multiple evaluations for a single resume; using the first"
        );
    }
    let Some(evaluation) = evaluations.into_iter().next() else {
        // generate() rejects empty sequences, so this is unreachable in
        // practice; record it as a candidate failure rather than panicking.
        return CandidateReport::failed(fallback_name, "AI returned empty content".to_string());
    };
    let candidate_name = evaluation.candidate_name.clone();

    let artifacts = match render_reports(
        &evaluation,
        &state.config.output_dir,
        &state.pdf_renderer,
    )
    .await
    {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!(candidate = %candidate_name, "report rendering failed: {e}");
            return CandidateReport::failed(candidate_name, e.to_string());
        }
    };

    let uploaded = upload_artifacts(state, &artifacts).await;
    artifacts.remove_local_files().await;

    match uploaded {
        Ok(s3_files) => CandidateReport::Succeeded {
            candidate_name,
            s3_files,
        },
        Err(e) => {
            error!(candidate = %candidate_name, "artifact upload failed: {e}");
            CandidateReport::failed(candidate_name, e.to_string())
        }
    }
}

async fn upload_artifacts(
    state: &AppState,
    artifacts: &ReportArtifactSet,
) -> Result<ReportUrls, UploadError> {
    Ok(ReportUrls {
        html: upload_report(state, &artifacts.html_path).await?,
        pdf: upload_report(state, &artifacts.pdf_path).await?,
        docx: upload_report(state, &artifacts.docx_path).await?,
    })
}

async fn upload_report(
    state: &AppState,
    path: &std::path::Path,
) -> Result<String, UploadError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report");
    let key = generate_key(name, REPORTS_PREFIX);
    upload_file(
        &state.s3,
        &state.config.s3_bucket,
        &state.config.aws_region,
        path,
        &key,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded_entry_serializes_with_s3_files() {
        let report = CandidateReport::Succeeded {
            candidate_name: "Jane Doe".to_string(),
            s3_files: ReportUrls {
                html: "https://bucket.s3.us-east-1.amazonaws.com/reports/a.html".to_string(),
                pdf: "https://bucket.s3.us-east-1.amazonaws.com/reports/a.pdf".to_string(),
                docx: "https://bucket.s3.us-east-1.amazonaws.com/reports/a.docx".to_string(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["candidateName"], "Jane Doe");
        assert!(json["s3Files"]["pdf"].as_str().unwrap().ends_with(".pdf"));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failed_entry_serializes_with_error_and_success_flag() {
        let report = CandidateReport::failed(
            "bob_resume".to_string(),
            "Invalid JSON response from AI".to_string(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["candidateName"], "bob_resume");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid JSON response from AI");
        assert!(json.get("s3Files").is_none());
    }

    #[test]
    fn test_upload_response_wire_shape() {
        let response = UploadResponse {
            success: true,
            submission_id: Uuid::nil(),
            reports: vec![CandidateReport::failed("x".to_string(), "boom".to_string())],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["submissionId"].is_string());
        assert_eq!(json["reports"].as_array().unwrap().len(), 1);
    }
}
