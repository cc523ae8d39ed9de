//! Run Inference
//!
//! The LLM client is an explicit value owned by the process and injected into
//! each worker. [`OllamaClient`] is the production implementation.

use async_trait::async_trait;
use xaiops_common::Result;

use crate::prompt::ModelInput;

mod answer;
mod ollama;
pub mod template;

pub use answer::{extract_json, parse_answer, LlmAnswer};
pub use ollama::OllamaClient;

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Render the prompt for `input`, call the model and parse its answer
    async fn infer(&self, input: &ModelInput) -> Result<LlmAnswer>;
}
