//! In-process Submission Queue

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use super::SubmissionQueue;
use crate::Result;

#[derive(Debug, Default)]
pub struct MemoryQueue {
    items: Mutex<VecDeque<String>>,
    available: Notify,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionQueue for MemoryQueue {
    async fn push(&self, payload: String) -> Result<()> {
        self.items.lock().await.push_back(payload);
        self.available.notify_one();
        Ok(())
    }

    async fn pop(&self, wait: Duration) -> Result<Option<String>> {
        let deadline = Instant::now() + wait;

        loop {
            let notified = self.available.notified();

            if let Some(item) = self.items.lock().await.pop_front() {
                return Ok(Some(item));
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(self.items.lock().await.pop_front());
            }
        }
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.items.lock().await.len())
    }
}
