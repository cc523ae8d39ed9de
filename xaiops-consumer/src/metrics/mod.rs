//! Metric Fetch
//!
//! Reads what the detectors recorded at the anomaly timestamp:
//! - per-metric actual values (PostgreSQL)
//! - dynamic-baseline ranges for the same minute of the week (RedisJSON)
//! - display descriptions for service metric ids (PostgreSQL)
//!
//! Sources return `Result`; callers decide how to degrade. The prompt builder
//! treats every error here as "no data".

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use xaiops_common::{Error, Result};

mod baseline;
mod postgres;

pub use baseline::{baseline_key, parse_baseline, BaselineKey};
pub use postgres::PostgresMetricSource;

/// Timestamp layout used by every request (`YYYY-MM-DD HH:MM:SS`, fraction optional)
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One metric value recorded at the anomaly timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub metric: String,
    pub real_value: Option<f64>,
}

impl MetricSample {
    pub fn new(metric: impl Into<String>, real_value: Option<f64>) -> Self {
        Self {
            metric: metric.into(),
            real_value,
        }
    }
}

/// Dynamic-baseline range for one metric and minute
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Baseline {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub avg: Option<f64>,
    pub std: Option<f64>,
}

/// What is being measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricTarget<'a> {
    /// A host / instance / DB target, `inst_type` is the tier type
    Instance { inst_type: &'a str, target_id: &'a str },
    /// A service transaction code
    Service { tx_code: &'a str },
}

impl<'a> MetricTarget<'a> {
    pub fn inst_type(&self) -> &'a str {
        match self {
            MetricTarget::Instance { inst_type, .. } => inst_type,
            MetricTarget::Service { .. } => "service",
        }
    }

    /// Target id or tx code
    pub fn id(&self) -> &'a str {
        match self {
            MetricTarget::Instance { target_id, .. } => target_id,
            MetricTarget::Service { tx_code } => tx_code,
        }
    }
}

/// Data access used to build model input
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Metric values recorded for `target` at `time`
    async fn metrics(&self, time: NaiveDateTime, target: MetricTarget<'_>) -> Result<Vec<MetricSample>>;

    /// Baseline range for `metric`; `None` when nothing is stored
    async fn baseline(
        &self,
        time: NaiveDateTime,
        metric: &str,
        target: MetricTarget<'_>,
    ) -> Result<Option<Baseline>>;

    /// Display descriptions keyed by metric id; ids without one are omitted
    async fn metric_descriptions(&self, metrics: &[String]) -> Result<HashMap<String, String>>;
}

/// Parse a request timestamp
pub fn parse_time(time: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(time.trim(), TIME_FORMAT)
        .map_err(|e| Error::Enrichment(format!("Invalid anomaly time {:?}: {}", time, e)))
}
