//! Request-derived context added to a model answer before it is stored

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xaiops_common::{AnalysisRequest, Error, Result};

use crate::inference::LlmAnswer;

/// Persisted response: answer fields flattened alongside the context fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedAnswer {
    #[serde(flatten)]
    pub answer: LlmAnswer,
    pub instance_name: Option<String>,
    pub group: Option<String>,
    /// Echo of the analyzed tier or tx code entry
    pub obj: Value,
}

pub fn enrich(answer: LlmAnswer, request: &AnalysisRequest) -> Result<EnrichedAnswer> {
    match request {
        AnalysisRequest::HostInstanceDb(req) => {
            let tier = req
                .first_tier()
                .ok_or_else(|| Error::Enrichment("Request has no tiers".to_string()))?;
            let instance = tier
                .instances
                .first()
                .ok_or_else(|| Error::Enrichment("First tier has no instances".to_string()))?;

            Ok(EnrichedAnswer {
                answer,
                instance_name: Some(instance.instance_name.clone()),
                group: Some(tier.name.clone()),
                obj: serde_json::to_value(tier)?,
            })
        }
        AnalysisRequest::Service(req) => {
            let (_, tx) = req
                .tx_codes
                .first()
                .ok_or_else(|| Error::Enrichment("Request has no tx_codes".to_string()))?;

            Ok(EnrichedAnswer {
                answer,
                instance_name: None,
                group: None,
                obj: serde_json::to_value(tx)?,
            })
        }
    }
}

impl EnrichedAnswer {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
