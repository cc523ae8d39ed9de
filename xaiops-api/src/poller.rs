//! Poller: wait for a key to reach a terminal status
//!
//! Samples the store every `interval` until the record is `success` or
//! `failed`, or `timeout` has elapsed. The last sleep is shortened so the
//! final sample lands on the deadline. A timed-out job keeps running and
//! its late write is visible to the next submission.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};
use xaiops_common::config::PollConfig;
use xaiops_common::{CorrelationKey, ResultStatus, ResultStore};

/// Result of waiting on one key
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Success(Value),
    /// Carries the stored cause for logging; never shown to clients
    Failed(Option<String>),
    TimedOut,
}

#[derive(Clone)]
pub struct Poller {
    store: Arc<dyn ResultStore>,
    interval: Duration,
    timeout: Duration,
}

impl Poller {
    pub fn new(store: Arc<dyn ResultStore>, interval: Duration, timeout: Duration) -> Self {
        Self {
            store,
            interval,
            timeout,
        }
    }

    pub fn from_config(store: Arc<dyn ResultStore>, config: &PollConfig) -> Self {
        Self::new(store, config.interval(), config.timeout())
    }

    pub async fn await_result(&self, key: &CorrelationKey) -> PollOutcome {
        let deadline = Instant::now() + self.timeout;
        let mut samples = 0u32;

        loop {
            samples += 1;
            match self.store.get(key).await {
                Ok(record) => match record.status {
                    ResultStatus::Success => {
                        debug!(key = %key, samples, "Result ready");
                        return PollOutcome::Success(record.response.unwrap_or(Value::Null));
                    }
                    ResultStatus::Failed => {
                        debug!(key = %key, samples, "Job failed");
                        return PollOutcome::Failed(record.error);
                    }
                    ResultStatus::Absent | ResultStatus::Running => {}
                },
                Err(e) => warn!(key = %key, error = %e, "Result store read failed, will retry"),
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(key = %key, samples, timeout_secs = self.timeout.as_secs(), "Timed out waiting for result");
                return PollOutcome::TimedOut;
            }
            tokio::time::sleep(self.interval.min(deadline - now)).await;
        }
    }
}
