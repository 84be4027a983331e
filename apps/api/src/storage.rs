//! Object-storage uploader. One PutObject per artifact, no automatic retry —
//! the orchestrator owns failure policy.
//!
//! Key layout is stable so operators can hang lifecycle rules off the
//! prefixes: `uploads/jobDescriptions/`, `uploads/resumes/`, `reports/`.

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::debug;

use crate::extract::file_extension;

pub const JOB_DESCRIPTIONS_PREFIX: &str = "uploads/jobDescriptions";
pub const RESUMES_PREFIX: &str = "uploads/resumes";
pub const REPORTS_PREFIX: &str = "reports";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("S3 upload failed for {key}: {message}")]
    Put { key: String, message: String },
}

/// Content type from the file extension; unknown extensions are opaque
/// binary.
pub fn content_type_for(path: &Path) -> &'static str {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    match file_extension(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("doc") => "application/msword",
        Some("html") => "text/html",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Deterministic storage key: `<prefix>/<sanitized name>_<millis><ext>`.
/// The timestamp keeps concurrent submissions and repeated uploads of the
/// same file from colliding.
pub fn generate_key(original_name: &str, prefix: &str) -> String {
    generate_key_at(original_name, prefix, chrono::Utc::now().timestamp_millis())
}

fn generate_key_at(original_name: &str, prefix: &str, timestamp_millis: i64) -> String {
    let lowered = original_name.to_lowercase();
    let path = Path::new(&lowered);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
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

    format!("{prefix}/{safe_stem}_{timestamp_millis}{extension}")
}

/// Uploads the local file under `key` and returns its retrieval URL.
pub async fn upload_file(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    region: &str,
    local_path: &Path,
    key: &str,
) -> Result<String, UploadError> {
    let body = ByteStream::from_path(local_path)
        .await
        .map_err(|e| UploadError::Read {
            path: local_path.display().to_string(),
            message: e.to_string(),
        })?;

    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(body)
        .content_type(content_type_for(local_path))
        .send()
        .await
        .map_err(|e| UploadError::Put {
            key: key.to_string(),
            message: e.to_string(),
        })?;

    debug!("uploaded {} to s3://{bucket}/{key}", local_path.display());
    Ok(format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"))
}
