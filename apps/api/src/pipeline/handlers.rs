//! Axum route handlers for the document pipeline.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::errors::AppError;
use crate::pipeline::intake::receive_submission;
use crate::pipeline::{process_submission, UploadResponse};
use crate::state::AppState;

/// POST /api/v1/docs/upload
///
/// Multipart intake: one "jobDescription" file and 1-3 "resumes" files.
/// Validation failures reject the whole submission with the specific
/// constraint breached; after that, each resume succeeds or fails on its
/// own and the response lists every one of them in upload order.
pub async fn handle_upload_docs(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let submission = receive_submission(&state.config, multipart).await?;
    let response = process_submission(&state, submission).await;
    Ok(Json(response))
}
