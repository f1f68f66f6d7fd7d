// youtube-converter library: acquisition orchestration, artifact store, HTTP routes

pub mod api;
pub mod config;
pub mod downloader;
pub mod store;

use axum::{routing::get, routing::post, Router};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use downloader::tools::ToolInfo;
use downloader::ConversionOrchestrator;
use store::CleanupSweeper;

/// State shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConversionOrchestrator>,
    pub sweeper: Arc<CleanupSweeper>,
    /// Retention applied by POST /cleanup
    pub retention: Duration,
    /// Engine availability captured at startup
    pub engine: Arc<ToolInfo>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ConversionOrchestrator>,
        sweeper: Arc<CleanupSweeper>,
        retention: Duration,
        engine: ToolInfo,
    ) -> Self {
        Self {
            orchestrator,
            sweeper,
            retention,
            engine: Arc::new(engine),
        }
    }
}

/// Build the application router; anything unrouted is served from `public_dir`
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/", get(api::serve_index))
        .route("/convert", post(api::convert))
        .route("/cleanup", post(api::cleanup))
        .merge(api::health_routes())
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
