use aws_sdk_s3::Client as S3Client;

use crate::ai_client::AiClient;
use crate::config::Config;
use crate::report::pdf::PdfRenderer;

/// Shared application state injected into all route handlers via Axum
/// extractors. Every field is cheaply cloneable; submissions share nothing
/// mutable with each other.
#[derive(Clone)]
pub struct AppState {
    pub s3: S3Client,
    pub ai: AiClient,
    pub pdf_renderer: PdfRenderer,
    pub config: Config,
}
