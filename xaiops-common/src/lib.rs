//! # XAIOps Common Library
//!
//! Shared code for the anomaly explanation services:
//! - Request DTOs and the queued [`Job`](models::Job) envelope
//! - Correlation key construction
//! - Result Store and Submission Queue abstractions (in-memory and Redis)
//! - Configuration loading
//! - Logging setup and shutdown signal handling

pub mod backend;
pub mod config;
pub mod error;
pub mod key;
pub mod logging;
pub mod models;
pub mod queue;
pub mod shutdown;
pub mod store;

pub use backend::Backends;
pub use error::{Error, Result};
pub use key::{build_key, CorrelationKey};
pub use models::{AnalysisRequest, Category, Job, ResultRecord, ResultStatus};
pub use queue::SubmissionQueue;
pub use store::ResultStore;
