//! Submission Queue: FIFO hand-off of serialized jobs
//!
//! Any number of producers push; a fixed pool of workers pops. The pop is the
//! only synchronization point between consumers.

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryQueue;
#[cfg(feature = "redis")]
pub use self::redis::RedisQueue;

#[async_trait]
pub trait SubmissionQueue: Send + Sync {
    /// Append a payload to the tail
    async fn push(&self, payload: String) -> Result<()>;

    /// Take the head, waiting up to `wait` for one to arrive
    ///
    /// `Ok(None)` means the wait elapsed with the queue empty.
    async fn pop(&self, wait: Duration) -> Result<Option<String>>;

    /// Number of queued payloads
    async fn len(&self) -> Result<usize>;
}
