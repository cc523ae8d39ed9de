//! xaiops-consumer - anomaly explanation worker
//!
//! Pops jobs from the shared Submission Queue, asks the LLM to explain each
//! anomaly and writes the answer to the Result Store. Run as many processes
//! as the inference backend can serve.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use xaiops_common::config::{AppConfig, StoreBackend};
use xaiops_common::logging::init_logging;
use xaiops_common::shutdown::shutdown_signal;
use xaiops_common::Backends;
use xaiops_consumer::{spawn_pool, WorkerDeps, WorkerSettings};

/// Command-line arguments for xaiops-consumer
#[derive(Parser, Debug)]
#[command(name = "xaiops-consumer")]
#[command(about = "LLM worker for XAIOps anomaly explanations")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "XAIOPS_CONFIG")]
    config: Option<PathBuf>,

    /// Number of workers (overrides worker.count)
    #[arg(short, long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(workers) = args.workers {
        config.worker.count = workers;
        config.validate().context("Invalid --workers")?;
    }

    let _log_guard = init_logging("consumer", &config.logging).context("Failed to initialize logging")?;

    info!("Starting xaiops-consumer");
    info!(
        "Version: {} (git {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if config.store.backend == StoreBackend::Memory {
        bail!("store.backend = \"memory\" is process-local; use xaiops-api --embedded-workers instead");
    }

    let backends = Backends::connect(&config)
        .await
        .context("Failed to connect result store and queue")?;
    let deps = WorkerDeps::connect(&config, backends)
        .await
        .context("Failed to initialize worker dependencies")?;

    let shutdown = CancellationToken::new();
    let handles = spawn_pool(
        config.worker.count,
        deps,
        WorkerSettings::from_config(&config),
        shutdown.clone(),
    );

    shutdown_signal().await;
    shutdown.cancel();
    info!("Waiting for workers to finish their current job");

    for handle in handles {
        if let Err(e) = handle.await {
            warn!("Worker task ended abnormally: {}", e);
        }
    }

    info!("Consumer shutdown complete");
    Ok(())
}
