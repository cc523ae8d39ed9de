//! GET /llm/answer/:timestamp
//!
//! Diagnostic endpoint for dashboard development. Produces one canned
//! explanation per anomaly entry in the body without touching the queue:
//! - `data.tx_codes.*.anomaly[]` entries named `elapse_avg` → `Service`
//! - every `data.tiers[].instances[]` entry → `Host` (os), `Instance` (was), `""` otherwise

use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{ApiError, ApiResult, AppState};

const CANNED_SUMMARY: &str = "
    Summary (CPU rising while memory stays normal on a Java WAS)
    1. Excessive garbage collection: repeated full GC raises CPU while memory holds steady.
    2. More CPU-bound work: runaway loops, lock contention or too many threads.
    3. JIT compiler load: dynamic compilation briefly consumes CPU.
    4. Heavy system calls or I/O: DB or network request bursts raise CPU only.

    To find the cause, check GC logs, top -H, jstack, iostat and strace.";

#[derive(Debug, Serialize, PartialEq)]
pub struct CannedAnswer {
    pub llm_answer: String,
    pub inst_type: String,
}

pub async fn canned_answers(
    Path(timestamp): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<Json<Vec<CannedAnswer>>> {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    if !(body.is_object() || body.is_null()) {
        return Err(ApiError::BadRequest("Body must be a JSON object".to_string()));
    }
    debug!(timestamp = %timestamp, "Canned answers requested");

    Ok(Json(build_canned_answers(&body)))
}

pub fn build_canned_answers(body: &Value) -> Vec<CannedAnswer> {
    let data = &body["data"];
    let mut answers = Vec::new();

    if let Some(tx_codes) = data["tx_codes"].as_object() {
        for details in tx_codes.values() {
            let tx_name = text(&details["name"]);
            for anomaly in details["anomaly"].as_array().into_iter().flatten() {
                if anomaly["name"].as_str() != Some("elapse_avg") {
                    continue;
                }
                let verdict = if anomaly["failure"].as_bool().unwrap_or(false) {
                    "anomaly detected"
                } else {
                    "close to threshold"
                };
                answers.push(CannedAnswer {
                    llm_answer: format!(
                        "\n    -----------TEST-----------\n    Transaction: {}, Target ID: {}, Metric: {}\n    Value: {}ms (normal range {} ~ {}ms) -> {}\n{}",
                        tx_name,
                        text(&anomaly["target_id"]),
                        text(&anomaly["metric_desc"]),
                        number(&anomaly["value"]),
                        number(&anomaly["lower"]),
                        number(&anomaly["upper"]),
                        verdict,
                        CANNED_SUMMARY
                    ),
                    inst_type: "Service".to_string(),
                });
            }
        }
    }

    for tier in data["tiers"].as_array().into_iter().flatten() {
        let inst_type = match tier["type"].as_str() {
            Some("os") => "Host",
            Some("was") => "Instance",
            _ => "",
        };
        for instance in tier["instances"].as_array().into_iter().flatten() {
            answers.push(CannedAnswer {
                llm_answer: format!(
                    "\n    -----------TEST-----------\n    Tier: {}, Instance: {}, Target ID: {}\n    Metric: {}, Status: {}\n{}",
                    text(&tier["name"]),
                    text(&instance["instance_name"]),
                    text(&instance["target_id"]),
                    text(&instance["metric"]),
                    text(&instance["status"]),
                    CANNED_SUMMARY
                ),
                inst_type: inst_type.to_string(),
            });
        }
    }

    answers
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn number(value: &Value) -> String {
    match value {
        Value::Null => "0".to_string(),
        other => text(other),
    }
}

pub fn answer_routes() -> Router<AppState> {
    Router::new().route("/answer/:timestamp", get(canned_answers))
}
