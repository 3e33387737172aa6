//! Frame Inspector - interactive frame cards over HTTP
//!
//! A Rust backend implementing a frame interaction state machine:
//! button protocols, an outbound link guard, and branching history.

mod api;
mod client;
mod config;
mod frame;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use client::{FrameService, HttpFrameService, LoggingService};
use config::AppConfig;
use runtime::{FrameClient, ServiceFrameClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frame_inspector=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env();

    // Frame request collaborators
    let http: Arc<dyn FrameService> =
        Arc::new(HttpFrameService::new(&config.proxy_url, config.request_timeout)?);
    let service: Arc<dyn FrameService> = Arc::new(LoggingService::new(http));
    tracing::info!(
        endpoint = %service.endpoint(),
        timeout_secs = config.request_timeout.as_secs(),
        "Frame proxy configured"
    );
    let client: Arc<dyn FrameClient> = Arc::new(ServiceFrameClient::new(service));

    // Create application state
    let state = AppState::new(client);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Frame inspector listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
