//! Unit of work placed on the Submission Queue

use serde::{Deserialize, Serialize};

use crate::key::CorrelationKey;
use crate::models::{AnalysisRequest, Category};
use crate::Result;

/// Queued analysis job
///
/// Created by the admission gate, consumed once by whichever worker pops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub correlation_key: CorrelationKey,
    pub request: AnalysisRequest,
}

impl Job {
    pub fn new(correlation_key: CorrelationKey, request: AnalysisRequest) -> Self {
        Self {
            correlation_key,
            request,
        }
    }

    pub fn category(&self) -> Category {
        self.request.category()
    }

    /// Encode for the queue wire format
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a queue payload
    pub fn from_payload(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}
