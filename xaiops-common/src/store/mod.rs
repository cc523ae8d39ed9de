//! Result Store: correlation key -> status/response
//!
//! The store is the only state shared between request handlers and workers.
//! Each write replaces the whole record for a key in one atomic operation;
//! there is no cross-key or store+queue transaction.

use async_trait::async_trait;
use serde_json::Value;

use crate::key::CorrelationKey;
use crate::models::{ResultRecord, ResultStatus};
use crate::Result;

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryResultStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisResultStore;

/// Shared key/value store of job results
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Current record for `key` ([`ResultStatus::Absent`] if none)
    async fn get(&self, key: &CorrelationKey) -> Result<ResultRecord>;

    /// Reset `key` to running with no response
    async fn mark_running(&self, key: &CorrelationKey) -> Result<()>;

    /// Terminal success with the enriched answer
    async fn mark_success(&self, key: &CorrelationKey, response: &Value) -> Result<()>;

    /// Terminal failure with the internal cause
    async fn mark_failed(&self, key: &CorrelationKey, error: &str) -> Result<()>;

    /// Status only
    async fn status(&self, key: &CorrelationKey) -> Result<ResultStatus> {
        Ok(self.get(key).await?.status)
    }
}
