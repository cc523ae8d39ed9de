//! Result Store entries

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Processing status of a correlation key
///
/// `Success` and `Failed` are terminal for the current submission; a new
/// submission of the same key resets it to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// No record exists for the key
    Absent,
    Running,
    Success,
    Failed,
}

impl ResultStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResultStatus::Success | ResultStatus::Failed)
    }

    /// Text stored in the `status` field of the shared store
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Absent => "absent",
            ResultStatus::Running => "running",
            ResultStatus::Success => "success",
            ResultStatus::Failed => "failed",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "absent" => Some(ResultStatus::Absent),
            "running" => Some(ResultStatus::Running),
            "success" => Some(ResultStatus::Success),
            "failed" => Some(ResultStatus::Failed),
            _ => None,
        }
    }
}

/// Status plus payload held for one correlation key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub status: ResultStatus,
    /// Enriched answer, only meaningful when `status == Success`
    pub response: Option<Value>,
    /// Failure cause, only meaningful when `status == Failed`
    pub error: Option<String>,
}

impl ResultRecord {
    pub fn absent() -> Self {
        Self {
            status: ResultStatus::Absent,
            response: None,
            error: None,
        }
    }

    pub fn running() -> Self {
        Self {
            status: ResultStatus::Running,
            response: None,
            error: None,
        }
    }

    pub fn success(response: Value) -> Self {
        Self {
            status: ResultStatus::Success,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Failed,
            response: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!ResultStatus::Absent.is_terminal());
        assert!(!ResultStatus::Running.is_terminal());
        assert!(ResultStatus::Success.is_terminal());
        assert!(ResultStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_text_matches_store_format() {
        for status in [
            ResultStatus::Absent,
            ResultStatus::Running,
            ResultStatus::Success,
            ResultStatus::Failed,
        ] {
            assert_eq!(ResultStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ResultStatus::parse("true"), None);
    }
}
