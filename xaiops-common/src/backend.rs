//! Construction of the shared store/queue pair from configuration

use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, StoreBackend};
use crate::queue::{MemoryQueue, SubmissionQueue};
use crate::store::{MemoryResultStore, ResultStore};
use crate::Result;

/// Handles to the two shared resources
#[derive(Clone)]
pub struct Backends {
    pub store: Arc<dyn ResultStore>,
    pub queue: Arc<dyn SubmissionQueue>,
}

impl Backends {
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryResultStore::new()),
            queue: Arc::new(MemoryQueue::new()),
        }
    }

    /// Connect the configured backend
    ///
    /// With Redis, the store keeps one auto-reconnecting connection and the
    /// queue draws from its own pool, since a pending `BLPOP` occupies the
    /// connection it runs on.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        match config.store.backend {
            StoreBackend::Memory => {
                info!("Using in-memory result store and queue");
                Ok(Self::in_memory())
            }
            StoreBackend::Redis => Self::connect_redis(config).await,
        }
    }

    #[cfg(feature = "redis")]
    async fn connect_redis(config: &AppConfig) -> Result<Self> {
        use crate::queue::RedisQueue;
        use crate::store::RedisResultStore;

        let store = RedisResultStore::connect(&config.store.redis_url).await?;
        let queue = RedisQueue::connect(
            &config.store.redis_url,
            config.queue.key.clone(),
            config.queue.pool_size,
        )?;
        info!(
            queue = %config.queue.key,
            pool_size = config.queue.pool_size,
            "Connected result store and queue to Redis"
        );

        Ok(Self {
            store: Arc::new(store),
            queue: Arc::new(queue),
        })
    }

    #[cfg(not(feature = "redis"))]
    async fn connect_redis(_config: &AppConfig) -> Result<Self> {
        Err(crate::Error::Config(
            "store.backend = \"redis\" requires the `redis` feature".to_string(),
        ))
    }
}
