//! Dynamic-baseline lookup keys
//!
//! Baselines live in RedisJSON documents, one per metric and weekday:
//!
//! `exem_aiops_anls_service/{inst_type}/all/dbsln/dbsln_{inst_type}_all_{target}_{metric}_day{d}`
//!
//! Each document maps minute-of-day (`.{hour*60+minute}`) to
//! `[lower, upper, avg, std]`. `d` is the weekday with Monday = 0; service
//! baselines are only split into weekday (0) and weekend (5).

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde_json::Value;
use xaiops_common::{Error, Result};

use super::{Baseline, MetricTarget};

/// Document key plus JSON path inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineKey {
    pub key: String,
    pub path: String,
}

pub fn baseline_key(time: NaiveDateTime, metric: &str, target: MetricTarget<'_>) -> BaselineKey {
    let inst_type = target.inst_type();
    let mut day = time.weekday().num_days_from_monday();
    if matches!(target, MetricTarget::Service { .. }) {
        day = if day <= 4 { 0 } else { 5 };
    }
    let minute = time.hour() * 60 + time.minute();

    BaselineKey {
        key: format!(
            "exem_aiops_anls_service/{it}/all/dbsln/dbsln_{it}_all_{target}_{metric}_day{day}",
            it = inst_type,
            target = target.id(),
            metric = metric,
            day = day
        ),
        path: format!(".{}", minute),
    }
}

/// Decode a `JSON.GET` reply
///
/// Accepts the bare array or one wrapped in a single-element array
/// (JSONPath replies). Missing trailing elements and nulls become `None`.
pub fn parse_baseline(raw: &str) -> Result<Option<Baseline>> {
    let value: Value = serde_json::from_str(raw)?;
    let items = match &value {
        Value::Null => return Ok(None),
        Value::Array(items) => match items.as_slice() {
            [Value::Array(inner)] => inner.as_slice(),
            items => items,
        },
        other => {
            return Err(Error::Enrichment(format!(
                "Unexpected baseline value: {}",
                other
            )))
        }
    };

    let at = |i: usize| items.get(i).and_then(Value::as_f64);
    Ok(Some(Baseline {
        lower: at(0),
        upper: at(1),
        avg: at(2),
        std: at(3),
    }))
}
