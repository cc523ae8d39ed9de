//! Common error types for XAIOps

use thiserror::Error;

/// Common result type for XAIOps operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the API and consumer services
#[derive(Error, Debug)]
pub enum Error {
    /// Shared store or queue error (wraps redis::RedisError)
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// No queue connection could be checked out of the pool
    #[cfg(feature = "redis")]
    #[error("Redis pool error: {0}")]
    RedisPool(#[from] deadpool_redis::PoolError),

    /// Metric database error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request is missing the fields that identify what is analyzed and when
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Metric, baseline or prompt construction failed
    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    /// Model call failed or answered outside the expected schema
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
