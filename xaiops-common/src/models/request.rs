//! Inbound analysis request shapes
//!
//! Two request categories travel through the same queue:
//! - **service**: transaction-code anomalies (`time`, `tx_codes`)
//! - **host_instance_db**: OS / WAS / DB tier anomalies (`summary.time`, `summary.tiers`)
//!
//! [`AnalysisRequest`] is the tagged union; its discriminant is serialized as
//! `category_inst_type`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Request category discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Service transaction analysis
    Service,
    /// Host / instance / database analysis
    HostInstanceDb,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Service => "service",
            Category::HostInstanceDb => "host_instance_db",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Service category
// ============================================================================

/// Single anomalous metric reported for a transaction code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub name: String,
    pub target_id: String,
    pub tx_code_name: String,
    pub metric_desc: String,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
    /// True when the value is outside the range, false when only near the bound
    pub failure: bool,
    pub unit: String,
}

/// Transaction performance summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub lower: f64,
    pub upper: f64,
    pub elapse_avg: f64,
    pub exec_count: f64,
}

/// Transaction code entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxCode {
    /// Transaction display name
    pub name: String,
    pub performance: Performance,
    pub anomaly: Vec<Anomaly>,
}

/// Transaction codes in the order they were received
///
/// Serialized as a JSON object. The first entry is the one a request is about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxCodes(Vec<(String, TxCode)>);

impl TxCodes {
    pub fn new(entries: Vec<(String, TxCode)>) -> Self {
        Self(entries)
    }

    pub fn first(&self) -> Option<(&str, &TxCode)> {
        self.0.first().map(|(code, tx)| (code.as_str(), tx))
    }

    pub fn get(&self, code: &str) -> Option<&TxCode> {
        self.0.iter().find(|(c, _)| c == code).map(|(_, tx)| tx)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TxCode)> {
        self.0.iter().map(|(code, tx)| (code.as_str(), tx))
    }
}

impl Serialize for TxCodes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, tx) in &self.0 {
            map.serialize_entry(code, tx)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TxCodes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TxCodesVisitor;

        impl<'de> Visitor<'de> for TxCodesVisitor {
            type Value = TxCodes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of transaction code to transaction data")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<TxCodes, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((code, tx)) = access.next_entry::<String, TxCode>()? {
                    entries.push((code, tx));
                }
                Ok(TxCodes(entries))
            }
        }

        deserializer.deserialize_map(TxCodesVisitor)
    }
}

/// Service (transaction code) analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub time: String,
    pub anomaly: bool,
    pub tx_codes: TxCodes,
    #[serde(default)]
    pub tiers: Vec<Value>,
}

// ============================================================================
// Host / instance / DB category
// ============================================================================

/// Monitored instance within a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub status: String,
    pub metric: String,
    #[serde(rename = "normalityScore")]
    pub normality_score: f64,
    pub target_id: String,
    pub instance_name: String,
    #[serde(default)]
    pub blocking_session: Option<String>,
}

/// Group of instances of one type (`os`, `was`, `db`, `tp` ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    #[serde(rename = "type")]
    pub tier_type: String,
    pub instances: Vec<Instance>,
}

/// Anomaly counters per layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyCount {
    pub os: i64,
    pub was: i64,
    pub tran: i64,
    pub db: i64,
}

/// Dashboard summary wrapping the tiers under analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub time: String,
    pub anomaly: bool,
    #[serde(default)]
    pub tx_codes: Map<String, Value>,
    #[serde(rename = "anomalyCountMap")]
    pub anomaly_count_map: AnomalyCount,
    pub tiers: Vec<Tier>,
}

/// Host / instance / database analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInstanceDbRequest {
    pub summary: Summary,
    #[serde(default)]
    pub nav: Option<String>,
}

impl HostInstanceDbRequest {
    /// The tier a request is about (only the first tier is analyzed)
    pub fn first_tier(&self) -> Option<&Tier> {
        self.summary.tiers.first()
    }

    /// The instance a request is about
    pub fn first_instance(&self) -> Option<&Instance> {
        self.first_tier().and_then(|tier| tier.instances.first())
    }
}

// ============================================================================
// Tagged union
// ============================================================================

/// Analysis request of either category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category_inst_type", rename_all = "snake_case")]
pub enum AnalysisRequest {
    Service(ServiceRequest),
    HostInstanceDb(HostInstanceDbRequest),
}

impl AnalysisRequest {
    /// Decode an inbound body, detecting its category
    ///
    /// An explicit `category_inst_type` wins. Otherwise a body carrying
    /// `tx_codes` without `tiers` is a service request, and a body carrying
    /// `summary` without top-level `tx_codes` is a host/instance/DB request.
    pub fn from_value(value: Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::MalformedRequest("request body must be a JSON object".to_string()))?;

        let category = match obj.get("category_inst_type").and_then(Value::as_str) {
            Some("service") => Category::Service,
            Some("host_instance_db") => Category::HostInstanceDb,
            Some(other) => {
                return Err(Error::MalformedRequest(format!(
                    "unsupported category_inst_type: {}",
                    other
                )))
            }
            None => detect_category(obj)?,
        };

        let decoded = match category {
            Category::Service => serde_json::from_value(value).map(AnalysisRequest::Service),
            Category::HostInstanceDb => {
                serde_json::from_value(value).map(AnalysisRequest::HostInstanceDb)
            }
        };

        decoded.map_err(|e| Error::MalformedRequest(format!("invalid {} request: {}", category, e)))
    }

    pub fn category(&self) -> Category {
        match self {
            AnalysisRequest::Service(_) => Category::Service,
            AnalysisRequest::HostInstanceDb(_) => Category::HostInstanceDb,
        }
    }

    /// Anomaly timestamp as sent by the client
    pub fn time(&self) -> &str {
        match self {
            AnalysisRequest::Service(req) => &req.time,
            AnalysisRequest::HostInstanceDb(req) => &req.summary.time,
        }
    }
}

fn detect_category(obj: &Map<String, Value>) -> Result<Category> {
    let has_tx_codes = is_present(obj.get("tx_codes"));
    let has_tiers = is_present(obj.get("tiers"));
    let has_summary = is_present(obj.get("summary"));

    if has_tx_codes && !has_tiers {
        Ok(Category::Service)
    } else if has_summary && !has_tx_codes {
        Ok(Category::HostInstanceDb)
    } else {
        Err(Error::MalformedRequest(
            "unrecognized request structure: expected `tx_codes` (service) or `summary` (host/instance/db)"
                .to_string(),
        ))
    }
}

/// Null, false, zero, and empty strings/arrays/objects count as absent
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
