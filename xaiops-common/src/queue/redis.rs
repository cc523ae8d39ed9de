//! Redis list-backed Submission Queue (`RPUSH` / `BLPOP`)
//!
//! `BLPOP` holds its connection until an item arrives or the wait elapses,
//! and Redis answers one connection's commands in order. Every operation
//! therefore checks its own connection out of a pool, so a waiting worker
//! never delays another worker's pop, a producer's push, or the Result Store
//! (which keeps a separate connection).

use std::time::Duration;

use ::redis::AsyncCommands;
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use tracing::info;

use super::SubmissionQueue;
use crate::{Error, Result};

#[derive(Clone)]
pub struct RedisQueue {
    pool: Pool,
    queue_key: String,
}

impl RedisQueue {
    /// Build a pool of at most `pool_size` connections to `url`
    ///
    /// Connections are opened on first use, so this does not touch Redis.
    pub fn connect(url: &str, queue_key: impl Into<String>, pool_size: usize) -> Result<Self> {
        let mut cfg = Config::from_url(url);
        cfg.pool = Some(PoolConfig::new(pool_size));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::Config(format!("Create Redis queue pool failed: {}", e)))?;
        info!(pool_size, "Created Redis queue connection pool");
        Ok(Self::from_pool(pool, queue_key))
    }

    pub fn from_pool(pool: Pool, queue_key: impl Into<String>) -> Self {
        Self {
            pool,
            queue_key: queue_key.into(),
        }
    }

    pub fn queue_key(&self) -> &str {
        &self.queue_key
    }
}

#[async_trait]
impl SubmissionQueue for RedisQueue {
    async fn push(&self, payload: String) -> Result<()> {
        let mut conn = self.pool.get().await?;
        conn.rpush::<_, _, ()>(&self.queue_key, payload).await?;
        Ok(())
    }

    async fn pop(&self, wait: Duration) -> Result<Option<String>> {
        let mut conn = self.pool.get().await?;
        let popped: Option<(String, String)> = ::redis::cmd("BLPOP")
            .arg(&self.queue_key)
            .arg(blpop_timeout_secs(wait))
            .query_async(&mut conn)
            .await?;
        Ok(popped.map(|(_, payload)| payload))
    }

    async fn len(&self) -> Result<usize> {
        let mut conn = self.pool.get().await?;
        Ok(conn.llen(&self.queue_key).await?)
    }
}

/// BLPOP takes whole seconds and treats 0 as "block forever"
fn blpop_timeout_secs(wait: Duration) -> u64 {
    wait.as_secs().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blpop_timeout_never_blocks_forever() {
        assert_eq!(blpop_timeout_secs(Duration::ZERO), 1);
        assert_eq!(blpop_timeout_secs(Duration::from_millis(300)), 1);
        assert_eq!(blpop_timeout_secs(Duration::from_secs(5)), 5);
    }

    #[test]
    fn test_connect_is_lazy() {
        let queue = RedisQueue::connect("redis://127.0.0.1:1/0", "llm_request_queue", 4).unwrap();
        assert_eq!(queue.queue_key(), "llm_request_queue");
        assert_eq!(queue.pool.status().max_size, 4);
    }
}
