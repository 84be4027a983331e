mod ai_client;
mod config;
mod errors;
mod extract;
mod models;
mod pipeline;
mod report;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::AiClient;
use crate::config::Config;
use crate::report::pdf::PdfRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing env vars or a bad AI_PROVIDER)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillSheet API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize AI client — provider is fixed for the process lifetime
    let ai = AiClient::new(config.ai_provider, config.ai_api_key.clone());
    info!("AI client initialized (provider: {})", config.ai_provider);

    // Initialize the headless PDF renderer
    let pdf_renderer = PdfRenderer::new(
        Duration::from_secs(config.render_timeout_secs),
        config.chrome_executable.clone(),
    );
    info!(
        "PDF renderer initialized (timeout: {}s)",
        config.render_timeout_secs
    );

    // Make sure the working directories exist before the first submission
    tokio::fs::create_dir_all(config.upload_dir.join("jobDescriptions")).await?;
    tokio::fs::create_dir_all(config.upload_dir.join("resumes")).await?;
    tokio::fs::create_dir_all(&config.output_dir).await?;

    // Build app state
    let state = AppState {
        s3,
        ai,
        pdf_renderer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "skillsheet-static",
    );

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(credentials);

    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let s3_config = loader.load().await;
    aws_sdk_s3::Client::new(&s3_config)
}
