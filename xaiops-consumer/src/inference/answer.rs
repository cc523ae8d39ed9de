//! Structured model answer and lenient extraction from raw model text

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use xaiops_common::{Error, Result};

/// Fixed answer schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmAnswer {
    #[serde(deserialize_with = "text")]
    pub inst_type: String,
    #[serde(deserialize_with = "text")]
    pub target_id: String,
    #[serde(deserialize_with = "text")]
    pub situation: String,
    #[serde(alias = "issues", deserialize_with = "text")]
    pub issue: String,
    #[serde(alias = "solutions", deserialize_with = "text")]
    pub solution: String,
    #[serde(default, deserialize_with = "text")]
    pub etc: String,
}

/// Accept strings, bullet lists and scalars; lists are joined line by line
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")),
        Value::Object(_) => Err(de::Error::custom("expected text, found an object")),
        other => Ok(other.to_string()),
    }
}

/// Isolate the JSON object inside model output
///
/// Strips markdown code fences and keeps the outermost `{...}` span.
pub fn extract_json(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(trimmed);

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    (start < end).then(|| &unfenced[start..=end])
}

/// Parse model output into an [`LlmAnswer`]
pub fn parse_answer(raw: &str) -> Result<LlmAnswer> {
    let json = extract_json(raw)
        .ok_or_else(|| Error::Inference("Model output contains no JSON object".to_string()))?;
    serde_json::from_str(json)
        .map_err(|e| Error::Inference(format!("Model output does not match answer schema: {}", e)))
}
