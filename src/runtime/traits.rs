//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::client::{FrameActionBody, FrameActionResponse, FrameError, FrameService, RedirectResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for the two frame request collaborators
#[async_trait]
pub trait FrameClient: Send + Sync {
    /// `post` button: fetch the next frame
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError>;

    /// `post_redirect` button: fetch the redirect status/location
    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: FrameClient + ?Sized> FrameClient for Arc<T> {
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError> {
        (**self).post_action(body).await
    }

    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError> {
        (**self).post_redirect(body).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use a `FrameService` as `FrameClient`
#[derive(Clone)]
pub struct ServiceFrameClient {
    service: Arc<dyn FrameService>,
}

impl ServiceFrameClient {
    pub fn new(service: Arc<dyn FrameService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl FrameClient for ServiceFrameClient {
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError> {
        self.service.post_action(body).await
    }

    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError> {
        self.service.post_redirect(body).await
    }
}
