//! Correlation key construction
//!
//! The key identifies "what is analyzed and when", so identical requests
//! arriving concurrently collapse onto one Result Store entry.
//!
//! **Format** (separator `_`, field order fixed):
//! - host_instance_db: `{summary.time}_tiers_{tiers[0].type}_{tiers[0].instances[0].target_id}`
//! - service: `{time}_tx_codes_{first tx_code}`
//!
//! Keys contain no random component and are stable across restarts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{AnalysisRequest, HostInstanceDbRequest, ServiceRequest};
use crate::{Error, Result};

/// Opaque correlation key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Wrap an existing key (e.g. one read back from the store)
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the correlation key for a request
///
/// Fails with [`Error::MalformedRequest`] when an identifying field is absent.
pub fn build_key(request: &AnalysisRequest) -> Result<CorrelationKey> {
    match request {
        AnalysisRequest::HostInstanceDb(req) => host_instance_db_key(req),
        AnalysisRequest::Service(req) => service_key(req),
    }
}

fn host_instance_db_key(req: &HostInstanceDbRequest) -> Result<CorrelationKey> {
    let time = required("summary.time", &req.summary.time)?;
    let tier = req
        .first_tier()
        .ok_or_else(|| Error::MalformedRequest("summary.tiers is empty".to_string()))?;
    let tier_type = required("summary.tiers[0].type", &tier.tier_type)?;
    let instance = tier.instances.first().ok_or_else(|| {
        Error::MalformedRequest("summary.tiers[0].instances is empty".to_string())
    })?;
    let target_id = required("summary.tiers[0].instances[0].target_id", &instance.target_id)?;

    Ok(CorrelationKey(format!(
        "{}_tiers_{}_{}",
        time, tier_type, target_id
    )))
}

fn service_key(req: &ServiceRequest) -> Result<CorrelationKey> {
    let time = required("time", &req.time)?;
    let (tx_code, _) = req
        .tx_codes
        .first()
        .ok_or_else(|| Error::MalformedRequest("tx_codes is empty".to_string()))?;
    let tx_code = required("tx_codes key", tx_code)?;

    Ok(CorrelationKey(format!("{}_tx_codes_{}", time, tx_code)))
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(Error::MalformedRequest(format!("{} is required", field)))
    } else {
        Ok(value)
    }
}
