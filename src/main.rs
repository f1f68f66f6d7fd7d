// youtube-converter - HTTP front end for converting YouTube IDs to media files

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use youtube_converter_lib::config::Config;
use youtube_converter_lib::downloader::backends::{DirectStreamBackend, YtDlpBackend};
use youtube_converter_lib::downloader::tools::ToolManager;
use youtube_converter_lib::downloader::ConversionOrchestrator;
use youtube_converter_lib::store::{ArtifactStore, CleanupSweeper, FsArtifactStore};
use youtube_converter_lib::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::parse();
    info!("Starting youtube-converter v{}", env!("CARGO_PKG_VERSION"));

    let store = FsArtifactStore::open(&config.public_dir)
        .with_context(|| format!("opening {}", config.public_dir.display()))?;
    info!("Artifact store: {}", store.root().display());
    let store: Arc<dyn ArtifactStore> = Arc::new(store);

    let engine = ToolManager::new().detect_ytdlp(config.ytdlp_path.as_deref());
    match &engine.version {
        Some(version) => info!("✓ yt-dlp {} at {}", version, engine.path.as_deref().unwrap_or("?")),
        None => warn!("yt-dlp not found; every conversion will fail until it is installed"),
    }

    let engine_config =
        config.engine_config(engine.path.clone().unwrap_or_else(|| "yt-dlp".to_string()));
    let fallback = DirectStreamBackend::new(engine_config.clone())
        .context("building direct-stream fallback")?;
    let orchestrator = ConversionOrchestrator::new(store.clone())
        .with_strategy(Box::new(YtDlpBackend::new(engine_config)))
        .with_strategy(Box::new(fallback));

    let sweeper = Arc::new(CleanupSweeper::new(store));
    if let Some(interval) = config.sweep_interval() {
        info!("Periodic cleanup every {}s", interval.as_secs());
        tokio::spawn(sweeper.clone().run_periodic(interval, config.retention()));
    }

    let state = AppState::new(Arc::new(orchestrator), sweeper, config.retention(), engine);
    let app = build_router(state, &config.public_dir);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("✅ Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
