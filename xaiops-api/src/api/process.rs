//! POST /llm/process
//!
//! Admission followed by polling. Every path that cannot produce an answer in
//! time (job failed, job still running at the deadline) answers 200 with the
//! same retry message; only unparseable or unkeyable bodies are rejected.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use xaiops_common::{AnalysisRequest, Error};

use crate::admission::AdmissionOutcome;
use crate::poller::PollOutcome;
use crate::{ApiResult, AppState};

/// Body returned when no answer is available
pub fn retry_message() -> Value {
    json!({ "message": "Please try again later." })
}

pub async fn process_request(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| Error::MalformedRequest(format!("Body is not valid JSON: {}", e)))?;
    let request = AnalysisRequest::from_value(value)?;
    info!(category = %request.category(), time = %request.time(), "Analysis request received");

    let admission = state.gate.submit(request).await?;
    let key = admission.key;

    match admission.outcome {
        AdmissionOutcome::Resolved(response) => Ok(Json(response)),
        AdmissionOutcome::Enqueued => match state.poller.await_result(&key).await {
            PollOutcome::Success(response) => {
                info!(key = %key, "Answer delivered");
                Ok(Json(response))
            }
            PollOutcome::Failed(cause) => {
                error!(key = %key, cause = cause.as_deref().unwrap_or("unknown"), "Job failed");
                Ok(Json(retry_message()))
            }
            PollOutcome::TimedOut => {
                warn!(key = %key, "No answer before timeout");
                Ok(Json(retry_message()))
            }
        },
    }
}

pub fn process_routes() -> Router<AppState> {
    Router::new().route("/process", post(process_request))
}
