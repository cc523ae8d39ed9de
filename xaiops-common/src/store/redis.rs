//! Redis-backed Result Store
//!
//! One hash per correlation key:
//!
//! | field      | value                                      |
//! |------------|--------------------------------------------|
//! | `status`   | `running` / `success` / `failed`           |
//! | `response` | enriched answer as JSON text, else `null`  |
//! | `error`    | failure cause, else empty                  |
//!
//! A missing hash means the key is absent. Entries are never expired here;
//! expiry is left to the Redis deployment's own policy.

use std::collections::HashMap;

use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::ResultStore;
use crate::key::CorrelationKey;
use crate::models::{ResultRecord, ResultStatus};
use crate::Result;

const FIELD_STATUS: &str = "status";
const FIELD_RESPONSE: &str = "response";
const FIELD_ERROR: &str = "error";

#[derive(Clone)]
pub struct RedisResultStore {
    conn: ConnectionManager,
}

impl RedisResultStore {
    /// Connect to the store at `url` (e.g. `redis://127.0.0.1:6379/0`)
    pub async fn connect(url: &str) -> Result<Self> {
        let client = ::redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Share an existing connection (e.g. with the queue)
    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    async fn write(&self, key: &CorrelationKey, status: ResultStatus, response: &str, error: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.hset_multiple::<_, _, _, ()>(
            key.as_str(),
            &[
                (FIELD_STATUS, status.as_str()),
                (FIELD_RESPONSE, response),
                (FIELD_ERROR, error),
            ],
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ResultStore for RedisResultStore {
    async fn get(&self, key: &CorrelationKey) -> Result<ResultRecord> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn.hgetall(key.as_str()).await?;
        decode_record(key, fields)
    }

    async fn mark_running(&self, key: &CorrelationKey) -> Result<()> {
        self.write(key, ResultStatus::Running, "null", "").await
    }

    async fn mark_success(&self, key: &CorrelationKey, response: &Value) -> Result<()> {
        let encoded = serde_json::to_string(response)?;
        self.write(key, ResultStatus::Success, &encoded, "").await
    }

    async fn mark_failed(&self, key: &CorrelationKey, error: &str) -> Result<()> {
        self.write(key, ResultStatus::Failed, "null", error).await
    }
}

/// Decode the hash fields of one key
///
/// Older writers stored the failure cause in `response`; it is used when
/// `error` is missing.
pub(crate) fn decode_record(key: &CorrelationKey, mut fields: HashMap<String, String>) -> Result<ResultRecord> {
    let Some(status_text) = fields.remove(FIELD_STATUS) else {
        return Ok(ResultRecord::absent());
    };

    let status = ResultStatus::parse(&status_text).unwrap_or_else(|| {
        warn!(key = %key, status = %status_text, "Unknown status in result store, treating as running");
        ResultStatus::Running
    });

    let response_text = fields.remove(FIELD_RESPONSE).unwrap_or_default();
    let error_text = fields.remove(FIELD_ERROR).filter(|e| !e.is_empty());

    match status {
        ResultStatus::Success => {
            let response: Value = serde_json::from_str(&response_text)?;
            Ok(ResultRecord::success(response))
        }
        ResultStatus::Failed => {
            let cause = error_text
                .or_else(|| Some(response_text).filter(|r| !r.is_empty() && r != "null"))
                .unwrap_or_default();
            Ok(ResultRecord::failed(cause))
        }
        ResultStatus::Running | ResultStatus::Absent => Ok(ResultRecord::running()),
    }
}
