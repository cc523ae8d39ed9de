//! PostgreSQL + RedisJSON metric source

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use redis::aio::ConnectionManager;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;
use xaiops_common::config::{BaselineConfig, DatabaseConfig};
use xaiops_common::Result;

use super::{baseline_key, parse_baseline, Baseline, MetricSample, MetricSource, MetricTarget};

/// Detector results in PostgreSQL, baselines in a separate Redis
pub struct PostgresMetricSource {
    pool: PgPool,
    baseline: ConnectionManager,
}

impl PostgresMetricSource {
    /// Build the pool lazily so the consumer starts even while the database is down
    pub async fn connect(database: &DatabaseConfig, baseline: &BaselineConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .connect_lazy(&database.url)?;

        let client = redis::Client::open(baseline.redis_url.as_str())?;
        let baseline = ConnectionManager::new(client).await?;

        Ok(Self::new(pool, baseline))
    }

    pub fn new(pool: PgPool, baseline: ConnectionManager) -> Self {
        Self { pool, baseline }
    }
}

#[async_trait]
impl MetricSource for PostgresMetricSource {
    async fn metrics(&self, time: NaiveDateTime, target: MetricTarget<'_>) -> Result<Vec<MetricSample>> {
        let rows: Vec<(String, Option<f64>)> = match target {
            MetricTarget::Instance { inst_type, target_id } => {
                sqlx::query_as(
                    "SELECT metric, real_value FROM ai_result_gdn_performance \
                     WHERE time = $1 AND target_id = $2 AND inst_type = $3",
                )
                .bind(time)
                .bind(target_id)
                .bind(inst_type)
                .fetch_all(&self.pool)
                .await?
            }
            MetricTarget::Service { tx_code } => {
                sqlx::query_as(
                    "SELECT metric, real_value FROM dbsln_result_service_performance \
                     WHERE time = $1 AND target_id = $2",
                )
                .bind(time)
                .bind(tx_code)
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(
            inst_type = target.inst_type(),
            target = target.id(),
            count = rows.len(),
            "Fetched metric values"
        );

        Ok(rows
            .into_iter()
            .map(|(metric, real_value)| MetricSample { metric, real_value })
            .collect())
    }

    async fn baseline(
        &self,
        time: NaiveDateTime,
        metric: &str,
        target: MetricTarget<'_>,
    ) -> Result<Option<Baseline>> {
        let location = baseline_key(time, metric, target);
        let mut conn = self.baseline.clone();

        let raw: Option<String> = redis::cmd("JSON.GET")
            .arg(&location.key)
            .arg(&location.path)
            .query_async(&mut conn)
            .await?;

        debug!(key = %location.key, path = %location.path, found = raw.is_some(), "Fetched baseline");

        match raw {
            Some(raw) => parse_baseline(&raw),
            None => Ok(None),
        }
    }

    async fn metric_descriptions(&self, metrics: &[String]) -> Result<HashMap<String, String>> {
        if metrics.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT metric_id, metric_desc FROM xaiops_meta_metric WHERE metric_id = ANY($1)",
        )
        .bind(metrics.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
