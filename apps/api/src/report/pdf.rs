//! PDF rendering — prints the canonical HTML through headless Chrome at A4
//! with backgrounds preserved.
//!
//! The engine can hang on malformed content, so every attempt runs under the
//! operator-configured timeout, and a fresh browser is launched per attempt
//! rather than reusing a possibly-wedged one. One retry, then the failure is
//! surfaced for that candidate only.

use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::warn;

use crate::report::RenderError;

/// A4 in inches, the page size the reports are printed at.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

const MAX_ATTEMPTS: u32 = 2;

/// Headless-browser PDF renderer. Holds configuration only; a browser is
/// launched per render attempt.
#[derive(Clone)]
pub struct PdfRenderer {
    timeout: Duration,
    chrome_executable: Option<String>,
}

impl PdfRenderer {
    pub fn new(timeout: Duration, chrome_executable: Option<String>) -> Self {
        Self {
            timeout,
            chrome_executable,
        }
    }

    /// Renders `html` to PDF bytes, retrying once on engine failure or
    /// timeout.
    pub async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut last_error = RenderError::Engine("render never attempted".to_string());

        for attempt in 1..=MAX_ATTEMPTS {
            match tokio::time::timeout(self.timeout, self.render_once(html)).await {
                Ok(Ok(bytes)) => return Ok(bytes),
                Ok(Err(e)) => {
                    warn!("PDF render attempt {attempt}/{MAX_ATTEMPTS} failed: {e}");
                    last_error = e;
                }
                Err(_) => {
                    warn!(
                        "PDF render attempt {attempt}/{MAX_ATTEMPTS} timed out after {:?}",
                        self.timeout
                    );
                    last_error = RenderError::Timeout(self.timeout);
                }
            }
        }

        Err(last_error)
    }

    async fn render_once(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
        ]);
        if let Some(executable) = &self.chrome_executable {
            builder = builder.chrome_executable(Path::new(executable));
        }
        let config = builder.build().map_err(RenderError::Engine)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Engine(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = print_page(&browser, html).await;

        let _ = browser.close().await;
        let _ = browser.wait().await;
        events.abort();

        result
    }
}

async fn print_page(browser: &Browser, html: &str) -> Result<Vec<u8>, RenderError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| RenderError::Engine(e.to_string()))?;

    page.set_content(html)
        .await
        .map_err(|e| RenderError::Engine(e.to_string()))?;

    let params = PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        ..Default::default()
    };

    page.pdf(params)
        .await
        .map_err(|e| RenderError::Engine(e.to_string()))
}
