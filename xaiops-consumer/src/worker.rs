//! Worker pool
//!
//! Each worker pops one job at a time and drives it to a terminal status:
//! build model input, run inference, enrich, store. A job that fails at any
//! step is recorded as `failed`; the loop itself never exits on a job error.
//! A panic inside a job is caught at the same boundary and recorded the same
//! way.
//!
//! Workers check the shutdown token between pops. A job already in progress
//! always runs to completion.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use xaiops_common::config::AppConfig;
use xaiops_common::{Backends, Job, ResultStore, SubmissionQueue};

use crate::enrich::enrich;
use crate::inference::{InferenceClient, OllamaClient};
use crate::metrics::PostgresMetricSource;
use crate::prompt::{BuildModelInput, PromptBuilder};

/// Wait after a failed queue pop before trying again
pub const POP_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Per-job failure, recorded as the `error` of the failed result
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Model input construction failed: {0}")]
    Enrichment(#[source] xaiops_common::Error),

    #[error("Inference failed: {0}")]
    Inference(#[source] xaiops_common::Error),

    #[error("Job panicked: {0}")]
    Panicked(String),
}

/// Shared collaborators handed to every worker
#[derive(Clone)]
pub struct WorkerDeps {
    pub queue: Arc<dyn SubmissionQueue>,
    pub store: Arc<dyn ResultStore>,
    pub input: Arc<dyn BuildModelInput>,
    pub inference: Arc<dyn InferenceClient>,
}

impl WorkerDeps {
    /// Production collaborators: PostgreSQL/RedisJSON metrics and Ollama
    pub async fn connect(config: &AppConfig, backends: Backends) -> xaiops_common::Result<Self> {
        let source = PostgresMetricSource::connect(&config.database, &config.baseline).await?;
        let inference = OllamaClient::new(&config.llm)?;
        info!(
            model = %config.llm.model_name,
            endpoint = %inference.endpoint(),
            "Inference client ready"
        );

        Ok(Self {
            queue: backends.queue,
            store: backends.store,
            input: Arc::new(PromptBuilder::new(Arc::new(source))),
            inference: Arc::new(inference),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Bounded wait per pop
    pub pop_timeout: Duration,
    /// Pause after each processed job
    pub cooldown: Duration,
}

impl WorkerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            pop_timeout: config.queue.pop_timeout(),
            cooldown: config.worker.cooldown(),
        }
    }
}

pub struct Worker {
    id: usize,
    deps: WorkerDeps,
    settings: WorkerSettings,
}

impl Worker {
    pub fn new(id: usize, deps: WorkerDeps, settings: WorkerSettings) -> Self {
        Self { id, deps, settings }
    }

    /// Pop and process jobs until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        info!(worker = self.id, "Worker started");

        while !shutdown.is_cancelled() {
            match self.deps.queue.pop(self.settings.pop_timeout).await {
                Ok(Some(payload)) => {
                    if self.handle_payload(&payload).await {
                        pause(self.settings.cooldown, &shutdown).await;
                    }
                }
                Ok(None) => debug!(worker = self.id, "Queue empty"),
                Err(e) => {
                    warn!(worker = self.id, error = %e, "Queue pop failed, backing off");
                    pause(POP_ERROR_BACKOFF, &shutdown).await;
                }
            }
        }

        info!(worker = self.id, "Worker stopped");
    }

    /// Decode and process one payload; false when it was dropped undecoded
    pub async fn handle_payload(&self, payload: &str) -> bool {
        let job = match Job::from_payload(payload) {
            Ok(job) => job,
            Err(e) => {
                error!(worker = self.id, error = %e, "Dropping undecodable queue payload");
                return false;
            }
        };

        let key = &job.correlation_key;
        info!(worker = self.id, key = %key, category = %job.category(), "Processing job");

        let outcome = AssertUnwindSafe(self.process(&job))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(JobError::Panicked(panic_message(&*panic))));

        match outcome {
            Ok(response) => match self.deps.store.mark_success(key, &response).await {
                Ok(()) => info!(worker = self.id, key = %key, "Job succeeded"),
                Err(e) => error!(worker = self.id, key = %key, error = %e, "Failed to store result"),
            },
            Err(job_error) => {
                error!(worker = self.id, key = %key, error = %job_error, "Job failed");
                if let Err(e) = self
                    .deps
                    .store
                    .mark_failed(key, &job_error.to_string())
                    .await
                {
                    error!(worker = self.id, key = %key, error = %e, "Failed to store failure status");
                }
            }
        }

        true
    }

    /// Run one job to its response value
    pub async fn process(&self, job: &Job) -> Result<Value, JobError> {
        let started = Instant::now();
        let input = self
            .deps
            .input
            .build(&job.request)
            .await
            .map_err(JobError::Enrichment)?;
        info!(
            worker = self.id,
            key = %job.correlation_key,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model input built"
        );

        let started = Instant::now();
        let answer = self
            .deps
            .inference
            .infer(&input)
            .await
            .map_err(JobError::Inference)?;
        info!(
            worker = self.id,
            key = %job.correlation_key,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Inference finished"
        );

        enrich(answer, &job.request)
            .and_then(|enriched| enriched.to_value())
            .map_err(JobError::Enrichment)
    }
}

/// Spawn `count` workers sharing `deps`
pub fn spawn_pool(
    count: usize,
    deps: WorkerDeps,
    settings: WorkerSettings,
    shutdown: CancellationToken,
) -> Vec<JoinHandle<()>> {
    info!(count, "Starting worker pool");
    (0..count)
        .map(|id| {
            let worker = Worker::new(id, deps.clone(), settings);
            tokio::spawn(worker.run(shutdown.clone()))
        })
        .collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

async fn pause(duration: Duration, shutdown: &CancellationToken) {
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = shutdown.cancelled() => {}
    }
}
