//! Main HTTP Gateway Server.

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use ocrelay_config::ServerConfig;
use ocrelay_extraction::Extractor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::{health_api, ocr_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub extractor: Arc<Extractor>,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(extractor: Arc<Extractor>) -> Self {
        Self {
            extractor,
            started_at: Utc::now(),
        }
    }
}

/// Build the Axum router with all API routes.
pub fn build_router(state: GatewayState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/api/OcrProcess/image-to-json", post(ocr_api::image_to_json))
        .route("/api/health", get(health_api::get_health))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Browser clients are served from another origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state, server))]
pub async fn start_server(addr: SocketAddr, state: GatewayState, server: &ServerConfig) -> Result<()> {
    let app = build_router(state, server);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("ocrelay gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ocrelay gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
