//! Ollama `/api/generate` client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xaiops_common::config::LlmConfig;
use xaiops_common::{Error, Result};

use super::template::{render_prompt, PromptStyle};
use super::{parse_answer, InferenceClient, LlmAnswer};
use crate::prompt::ModelInput;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Non-streaming Ollama client constrained to JSON output
pub struct OllamaClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    num_predict: u32,
    style: PromptStyle,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/generate", normalize_base_url(&config.base_url)),
            model: config.model_name.clone(),
            temperature: config.temperature,
            num_predict: config.max_length,
            style: PromptStyle::for_model(&config.model_name),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a raw prompt, returning the model's `response` text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Ollama request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Ollama returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Invalid Ollama response: {}", e)))?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn infer(&self, input: &ModelInput) -> Result<LlmAnswer> {
        let prompt = render_prompt(self.style, input);
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending prompt");

        let started = Instant::now();
        let raw = self.generate(&prompt).await?;
        info!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model response received"
        );
        debug!(response = %raw, "Raw model output");

        parse_answer(&raw)
    }
}

/// Prefix `http://` when no scheme is given and drop trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(normalize_base_url("https://llm.local/"), "https://llm.local");
        assert_eq!(normalize_base_url("http://gpu01:11434"), "http://gpu01:11434");
    }
}
