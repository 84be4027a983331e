//! Submission intake — multipart parsing, validation, and temp-file
//! persistence.
//!
//! Validation runs over the fully-buffered upload BEFORE anything touches
//! disk, so a rejected submission leaves no temporary files behind. Stored
//! filenames are namespaced by millisecond timestamp + sanitized name;
//! concurrent submissions share the upload directory without collisions.

use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::extract::file_extension;

pub const FIELD_JOB_DESCRIPTION: &str = "jobDescription";
pub const FIELD_RESUMES: &str = "resumes";

pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_TOTAL_FILES: usize = 4;
pub const MAX_RESUMES: usize = 3;

const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "doc"];

const ERR_MISSING_FILES: &str = "Job description and resumes are required";
const ERR_FILE_TOO_LARGE: &str = "File too large. Maximum size is 5MB per file.";
const ERR_TOO_MANY_FILES: &str = "Too many files. Maximum is 1 job description and 3 resumes.";
const ERR_UNEXPECTED_FIELD: &str = r#"Unexpected field name. Use "jobDescription" and "resumes"."#;
const ERR_INVALID_TYPE: &str = "Invalid file type. Only PDF, DOCX, and DOC files are allowed.";

/// One file part pulled out of the multipart body, still in memory.
#[derive(Debug, Clone)]
pub struct IncomingPart {
    pub field: String,
    pub file_name: String,
    pub data: Bytes,
}

/// Metadata for one uploaded file after it has been persisted to disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// One validated upload event: a job description plus 1-3 resumes.
/// Owned by exactly one orchestration run; its temp files are removed on
/// every terminal transition.
#[derive(Debug)]
pub struct Submission {
    pub id: Uuid,
    pub job_description: StoredFile,
    pub resumes: Vec<StoredFile>,
}

impl Submission {
    /// Removes the stored upload copies. Best-effort by design: cleanup must
    /// never turn a completed submission into a failed one.
    pub async fn cleanup(&self) {
        for file in std::iter::once(&self.job_description).chain(self.resumes.iter()) {
            if let Err(e) = tokio::fs::remove_file(&file.path).await {
                warn!("failed to remove temp file {}: {e}", file.path.display());
            }
        }
    }
}

/// Reads the multipart body, validates it, and persists the files under the
/// configured upload directory. Any violation rejects the whole submission
/// before processing starts.
pub async fn receive_submission(
    config: &Config,
    mut multipart: Multipart,
) -> Result<Submission, AppError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != FIELD_JOB_DESCRIPTION && field_name != FIELD_RESUMES {
            return Err(AppError::Validation(ERR_UNEXPECTED_FIELD.to_string()));
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?;

        parts.push(IncomingPart {
            field: field_name,
            file_name,
            data,
        });
    }

    validate_parts(&parts).map_err(AppError::Validation)?;
    persist(config, parts).await
}

/// Checks every constraint from the upload contract and returns the specific
/// message for the first breach found.
pub fn validate_parts(parts: &[IncomingPart]) -> Result<(), String> {
    if parts.len() > MAX_TOTAL_FILES {
        return Err(ERR_TOO_MANY_FILES.to_string());
    }

    for part in parts {
        let allowed = file_extension(&part.file_name)
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        if !allowed {
            return Err(ERR_INVALID_TYPE.to_string());
        }
        if part.data.len() > MAX_FILE_BYTES {
            return Err(ERR_FILE_TOO_LARGE.to_string());
        }
    }

    let jd_count = parts
        .iter()
        .filter(|p| p.field == FIELD_JOB_DESCRIPTION)
        .count();
    let resume_count = parts.iter().filter(|p| p.field == FIELD_RESUMES).count();

    if jd_count == 0 || resume_count == 0 {
        return Err(ERR_MISSING_FILES.to_string());
    }
    if jd_count > 1 || resume_count > MAX_RESUMES {
        return Err(ERR_TOO_MANY_FILES.to_string());
    }

    Ok(())
}

/// Writes the validated parts to disk. If any write fails, the files written
/// so far are removed before the error surfaces.
async fn persist(config: &Config, parts: Vec<IncomingPart>) -> Result<Submission, AppError> {
    let jd_dir = config.upload_dir.join("jobDescriptions");
    let resumes_dir = config.upload_dir.join("resumes");

    let mut job_description = None;
    let mut resumes = Vec::new();
    let mut written: Vec<PathBuf> = Vec::new();

    for part in parts {
        let dir = if part.field == FIELD_JOB_DESCRIPTION {
            &jd_dir
        } else {
            &resumes_dir
        };
        let path = dir.join(stored_filename(
            &part.file_name,
            chrono::Utc::now().timestamp_millis(),
        ));

        let result: std::io::Result<()> = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, &part.data).await
        }
        .await;

        if let Err(e) = result {
            for stale in &written {
                let _ = tokio::fs::remove_file(stale).await;
            }
            return Err(AppError::Internal(anyhow::anyhow!(
                "failed to store upload {}: {e}",
                part.file_name
            )));
        }
        written.push(path.clone());

        let stored = StoredFile {
            original_name: part.file_name,
            path,
            size: part.data.len() as u64,
        };
        if part.field == FIELD_JOB_DESCRIPTION {
            job_description = Some(stored);
        } else {
            resumes.push(stored);
        }
    }

    // validate_parts guarantees exactly one job description.
    let job_description = job_description
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("job description vanished after validation")))?;

    Ok(Submission {
        id: Uuid::new_v4(),
        job_description,
        resumes,
    })
}

/// Stored filename: lowercased stem with non-alphanumerics collapsed to `_`,
/// suffixed with a millisecond timestamp.
fn stored_filename(original_name: &str, timestamp_millis: i64) -> String {
    let lowered = original_name.to_lowercase();
    let path = Path::new(&lowered);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let safe_stem: String = stem
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                ch
            } else {
                '_'
            }
        })
        .collect();

    format!("{safe_stem}_{timestamp_millis}{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(field: &str, file_name: &str, len: usize) -> IncomingPart {
        IncomingPart {
            field: field.to_string(),
            file_name: file_name.to_string(),
            data: Bytes::from(vec![0u8; len]),
        }
    }

    fn valid_set() -> Vec<IncomingPart> {
        vec![
            part(FIELD_JOB_DESCRIPTION, "jd.pdf", 1024),
            part(FIELD_RESUMES, "jane.pdf", 1024),
            part(FIELD_RESUMES, "bob.docx", 1024),
        ]
    }

    #[test]
    fn test_valid_submission_passes() {
        assert!(validate_parts(&valid_set()).is_ok());
    }

    #[test]
    fn test_oversized_file_is_rejected_with_specific_message() {
        let parts = vec![
            part(FIELD_JOB_DESCRIPTION, "jd.pdf", 6 * 1024 * 1024),
            part(FIELD_RESUMES, "jane.pdf", 1024),
        ];
        assert_eq!(validate_parts(&parts).unwrap_err(), ERR_FILE_TOO_LARGE);
    }

    #[test]
    fn test_txt_resume_is_rejected_as_invalid_type() {
        let parts = vec![
            part(FIELD_JOB_DESCRIPTION, "jd.pdf", 1024),
            part(FIELD_RESUMES, "resume.txt", 1024),
        ];
        assert_eq!(validate_parts(&parts).unwrap_err(), ERR_INVALID_TYPE);
    }

    #[test]
    fn test_missing_resumes_is_rejected() {
        let parts = vec![part(FIELD_JOB_DESCRIPTION, "jd.pdf", 1024)];
        assert_eq!(validate_parts(&parts).unwrap_err(), ERR_MISSING_FILES);
    }

    #[test]
    fn test_four_resumes_is_rejected_as_too_many() {
        let mut parts = valid_set();
        parts.push(part(FIELD_RESUMES, "extra1.pdf", 10));
        parts.push(part(FIELD_RESUMES, "extra2.pdf", 10));
        assert_eq!(validate_parts(&parts).unwrap_err(), ERR_TOO_MANY_FILES);
    }

    #[test]
    fn test_two_job_descriptions_is_rejected() {
        let parts = vec![
            part(FIELD_JOB_DESCRIPTION, "jd1.pdf", 10),
            part(FIELD_JOB_DESCRIPTION, "jd2.pdf", 10),
            part(FIELD_RESUMES, "jane.pdf", 10),
        ];
        assert_eq!(validate_parts(&parts).unwrap_err(), ERR_TOO_MANY_FILES);
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let parts = vec![
            part(FIELD_JOB_DESCRIPTION, "JD.PDF", 10),
            part(FIELD_RESUMES, "Jane.DocX", 10),
        ];
        assert!(validate_parts(&parts).is_ok());
    }

    #[test]
    fn test_stored_filename_is_namespaced_and_sanitized() {
        let name = stored_filename("Jane Doe CV (final).PDF", 1700000000000);
        assert_eq!(name, "jane_doe_cv__final__1700000000000.pdf");
    }

    #[test]
    fn test_stored_filename_distinct_timestamps_differ() {
        assert_ne!(stored_filename("cv.pdf", 1), stored_filename("cv.pdf", 2));
    }
}
