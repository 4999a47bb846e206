//! pcv-qs (Queue Server) - deletion queue persistence service
//!
//! Persists the viewer's deletion queue to a shared JSON file. Commits are
//! full replacements serialized by an exclusive file lock, so concurrent
//! requests and concurrent server processes never interleave writes.

use anyhow::{Context, Result};
use clap::Parser;
use pcv_common::config::ensure_directory_exists;
use pcv_qs::config::{Args, ServerConfig};
use pcv_qs::{build_router, AppState, QueueStore};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(&args).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    // Build identification first, before any filesystem work
    info!(
        "Starting PCV Queue Server (pcv-qs) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    ensure_directory_exists(&config.root_folder)
        .with_context(|| format!("Failed to create root folder {}", config.root_folder.display()))?;

    let queue_file = std::path::absolute(&config.queue_file)
        .context("Failed to resolve queue file path")?;
    if let Some(parent) = queue_file.parent() {
        ensure_directory_exists(parent)
            .with_context(|| format!("Failed to create queue directory {}", parent.display()))?;
    }

    info!("Root folder: {}", config.root_folder.display());
    info!("Queue file: {}", queue_file.display());
    info!("Scores file: {}", config.scores_file.display());
    if config.cors_permissive {
        warn!("CORS allows all origins; set cors_permissive = false outside development");
    }

    let store = QueueStore::new(queue_file);
    // Surface path problems at startup rather than on the first commit
    store
        .resolve_target()
        .context("Queue file path verification failed")?;

    let state = AppState::new(store, config.scores_file.clone(), config.cors_permissive);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;
    info!("pcv-qs listening on http://{}", config.listen);
    info!("Health check: http://{}/health", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
