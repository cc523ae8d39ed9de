//! # XAIOps Consumer
//!
//! Queue worker that explains detected anomalies with an LLM:
//! - [`metrics`]: detector results and baselines at the anomaly time
//! - [`prompt`]: model input rendering
//! - [`inference`]: Ollama client and answer parsing
//! - [`enrich`]: request context merged into the stored answer
//! - [`worker`]: the pop/process/store loop

pub mod enrich;
pub mod inference;
pub mod metrics;
pub mod prompt;
pub mod worker;

pub use worker::{spawn_pool, Worker, WorkerDeps, WorkerSettings};
