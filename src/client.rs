//! Frame request collaborators
//!
//! `postFrameAction` and `postFrameRedirect` behind a common interface.

mod error;
mod http;
mod types;

#[allow(unused_imports)] // Public API re-exports
pub use error::{FrameError, FrameErrorKind};
pub use http::HttpFrameService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for frame request backends
#[async_trait]
pub trait FrameService: Send + Sync {
    /// State-changing action; returns the next frame
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError>;

    /// Redirect action; returns the HTTP-style status/location pair
    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError>;

    /// Where requests go (for logging)
    fn endpoint(&self) -> &str;
}

/// Logging wrapper for frame services
pub struct LoggingService {
    inner: Arc<dyn FrameService>,
    endpoint: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn FrameService>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl FrameService for LoggingService {
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError> {
        let start = std::time::Instant::now();
        let result = self.inner.post_action(body).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    button_index = body.button_index,
                    post_url = %body.post_url,
                    context_url = %response.context_url(),
                    duration_ms = %duration.as_millis(),
                    "Frame action completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    button_index = body.button_index,
                    post_url = %body.post_url,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Frame action failed"
                );
            }
        }

        result
    }

    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError> {
        let start = std::time::Instant::now();
        let result = self.inner.post_redirect(body).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    button_index = body.button_index,
                    post_url = %body.post_url,
                    status = response.status,
                    duration_ms = %duration.as_millis(),
                    "Frame redirect completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    button_index = body.button_index,
                    post_url = %body.post_url,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Frame redirect failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
