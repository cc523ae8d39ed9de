//! Admission Gate
//!
//! Decides, per submission, between returning a stored answer and queueing
//! a new job:
//! - `success` already stored: return it, enqueue nothing
//! - `absent`, `running` or `failed`: reset to `running` and enqueue
//!
//! The status write and the push are two separate operations. A worker may
//! write the same key between them; whichever write lands last is what
//! pollers observe.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use xaiops_common::{
    build_key, AnalysisRequest, CorrelationKey, Job, Result, ResultStatus, ResultStore,
    SubmissionQueue,
};

/// What happened to a submission
#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionOutcome {
    /// A stored answer was found
    Resolved(Value),
    /// A job was queued; poll for its result
    Enqueued,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub key: CorrelationKey,
    pub outcome: AdmissionOutcome,
}

impl Admission {
    pub fn already_resolved(&self) -> bool {
        matches!(self.outcome, AdmissionOutcome::Resolved(_))
    }
}

#[derive(Clone)]
pub struct AdmissionGate {
    store: Arc<dyn ResultStore>,
    queue: Arc<dyn SubmissionQueue>,
}

impl AdmissionGate {
    pub fn new(store: Arc<dyn ResultStore>, queue: Arc<dyn SubmissionQueue>) -> Self {
        Self { store, queue }
    }

    /// Short-circuit on a stored answer, otherwise mark running and enqueue
    ///
    /// Fails with `MalformedRequest` before touching the store when the key
    /// cannot be built.
    pub async fn submit(&self, request: AnalysisRequest) -> Result<Admission> {
        let key = build_key(&request)?;
        let record = self.store.get(&key).await?;

        if record.status == ResultStatus::Success {
            match record.response {
                Some(response) => {
                    info!(key = %key, "Stored answer found, skipping queue");
                    return Ok(Admission {
                        key,
                        outcome: AdmissionOutcome::Resolved(response),
                    });
                }
                None => warn!(key = %key, "Stored success has no response, running the job again"),
            }
        }
        debug!(key = %key, previous = record.status.as_str(), "Admitting new job");

        self.store.mark_running(&key).await?;
        let payload = Job::new(key.clone(), request).to_payload()?;
        self.queue.push(payload).await?;
        info!(key = %key, "Job queued");

        Ok(Admission {
            key,
            outcome: AdmissionOutcome::Enqueued,
        })
    }
}
