//! xaiops-api - anomaly explanation HTTP service
//!
//! **Deployment shapes:**
//! - Split: this process plus one or more `xaiops-consumer` processes sharing Redis
//! - Embedded: `--embedded-workers N` runs the worker pool in this process

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use xaiops_api::{build_router, AppState};
use xaiops_common::config::{AppConfig, StoreBackend};
use xaiops_common::logging::init_logging;
use xaiops_common::shutdown::shutdown_signal;
use xaiops_common::Backends;
use xaiops_consumer::{spawn_pool, WorkerDeps, WorkerSettings};

/// Command-line arguments for xaiops-api
#[derive(Parser, Debug)]
#[command(name = "xaiops-api")]
#[command(about = "HTTP API for XAIOps anomaly explanations")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "XAIOPS_CONFIG")]
    config: Option<PathBuf>,

    /// Run this many workers inside the API process
    #[arg(long, default_value_t = 0)]
    embedded_workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = init_logging("api", &config.logging).context("Failed to initialize logging")?;

    info!("Starting xaiops-api");
    info!(
        "Version: {} (git {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if config.store.backend == StoreBackend::Memory && args.embedded_workers == 0 {
        bail!("store.backend = \"memory\" needs --embedded-workers, no other process can reach it");
    }

    if args.embedded_workers >= config.queue.pool_size {
        bail!(
            "--embedded-workers {} needs queue.pool_size above it (currently {})",
            args.embedded_workers,
            config.queue.pool_size
        );
    }

    let backends = Backends::connect(&config)
        .await
        .context("Failed to connect result store and queue")?;

    let shutdown = CancellationToken::new();
    let workers = if args.embedded_workers > 0 {
        let deps = WorkerDeps::connect(&config, backends.clone())
            .await
            .context("Failed to initialize embedded workers")?;
        spawn_pool(
            args.embedded_workers,
            deps,
            WorkerSettings::from_config(&config),
            shutdown.clone(),
        )
    } else {
        Vec::new()
    };

    let state = AppState::new(backends, &config.poll);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind_addr))?;
    info!("Listening on http://{}", config.server.bind_addr);
    info!("Health check: http://{}/health", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown.cancel();
    for handle in workers {
        if let Err(e) = handle.await {
            warn!("Worker task ended abnormally: {}", e);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
