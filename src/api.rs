//! HTTP API for mounted frame cards

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::{FrameClient, RuntimeManager};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
}

impl AppState {
    pub fn new(client: Arc<dyn FrameClient>) -> Self {
        Self {
            runtime: Arc::new(RuntimeManager::new(client)),
        }
    }
}
