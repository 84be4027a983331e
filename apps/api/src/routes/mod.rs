pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

/// Body ceiling for the multipart upload route: 4 files at 5 MB plus
/// multipart framing. Per-file limits are enforced in intake so the client
/// gets the specific constraint it breached, not a bare 413.
const MAX_UPLOAD_BODY_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/docs/upload",
            post(handlers::handle_upload_docs).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .with_state(state)
}
