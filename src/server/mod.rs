//! HTTP API for document analysis
//!
//! Routes:
//!   GET  /               liveness probe
//!   GET  /health         version, uptime and storage status
//!   POST /analyze        multipart upload (`file`), optional `?store=false`
//!   GET  /storage/stats  storage usage against quota

pub mod error;
pub mod handlers;

use crate::analysis::AnalysisEngine;
use crate::config::Config;
use crate::error::Result;
use crate::input::InputManager;
use crate::storage::StorageManager;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// Headroom on top of the file itself for multipart framing and other fields
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnalysisEngine>,
    pub inputs: Arc<InputManager>,
    pub storage: Option<Arc<StorageManager>>,
    pub max_upload_bytes: usize,
    pub allow_any_origin: bool,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &Config, storage: Option<Arc<StorageManager>>) -> Result<Self> {
        Ok(Self {
            engine: Arc::new(AnalysisEngine::new(&config.analysis)?),
            inputs: Arc::new(InputManager::new().with_cache(false)),
            storage,
            max_upload_bytes: config.server.max_upload_bytes,
            allow_any_origin: config.server.allow_any_origin,
            start_time: Instant::now(),
        })
    }

    /// Build state, connecting to object storage when it is enabled
    pub async fn from_config(config: &Config) -> Result<Self> {
        let storage = if config.storage.enabled {
            Some(Arc::new(StorageManager::connect(&config.storage).await?))
        } else {
            log::info!("Storage disabled; uploads and results are not persisted");
            None
        };
        Self::new(config, storage)
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let allow_any_origin = state.allow_any_origin;

    let app = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/analyze", post(handlers::analyze_handler))
        .route("/storage/stats", get(handlers::storage_stats_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    if allow_any_origin {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
