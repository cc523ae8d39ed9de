//! In-process Result Store
//!
//! Used when the API embeds its workers, and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::ResultStore;
use crate::key::CorrelationKey;
use crate::models::ResultRecord;
use crate::Result;

#[derive(Debug, Default)]
pub struct MemoryResultStore {
    records: RwLock<HashMap<CorrelationKey, ResultRecord>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a record
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn put(&self, key: &CorrelationKey, record: ResultRecord) {
        self.records.write().await.insert(key.clone(), record);
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn get(&self, key: &CorrelationKey) -> Result<ResultRecord> {
        Ok(self
            .records
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_else(ResultRecord::absent))
    }

    async fn mark_running(&self, key: &CorrelationKey) -> Result<()> {
        self.put(key, ResultRecord::running()).await;
        Ok(())
    }

    async fn mark_success(&self, key: &CorrelationKey, response: &Value) -> Result<()> {
        self.put(key, ResultRecord::success(response.clone())).await;
        Ok(())
    }

    async fn mark_failed(&self, key: &CorrelationKey, error: &str) -> Result<()> {
        self.put(key, ResultRecord::failed(error)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_key_is_absent() {
        let store = MemoryResultStore::new();
        let key = CorrelationKey::from_raw("k");
        assert_eq!(store.get(&key).await.unwrap(), ResultRecord::absent());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_lifecycle_running_success_then_reset() {
        let store = MemoryResultStore::new();
        let key = CorrelationKey::from_raw("k");

        store.mark_running(&key).await.unwrap();
        assert_eq!(store.status(&key).await.unwrap(), ResultStatus::Running);

        store.mark_success(&key, &json!({"situation": "ok"})).await.unwrap();
        let record = store.get(&key).await.unwrap();
        assert_eq!(record.status, ResultStatus::Success);
        assert_eq!(record.response, Some(json!({"situation": "ok"})));

        // Resubmission starts a new generation
        store.mark_running(&key).await.unwrap();
        let record = store.get(&key).await.unwrap();
        assert_eq!(record.status, ResultStatus::Running);
        assert_eq!(record.response, None);
    }

    #[tokio::test]
    async fn test_failed_keeps_cause() {
        let store = MemoryResultStore::new();
        let key = CorrelationKey::from_raw("k");
        store.mark_failed(&key, "model unreachable").await.unwrap();

        let record = store.get(&key).await.unwrap();
        assert_eq!(record.status, ResultStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("model unreachable"));
        assert_eq!(store.len().await, 1);
    }
}
