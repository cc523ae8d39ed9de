//! Ollama client tests against a mock server

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xaiops_common::config::LlmConfig;
use xaiops_common::Error;
use xaiops_consumer::inference::{InferenceClient, OllamaClient};
use xaiops_consumer::prompt::ModelInput;

fn config_for(server: &MockServer, model: &str) -> LlmConfig {
    LlmConfig {
        model_name: model.to_string(),
        base_url: server.uri(),
        temperature: 0.0,
        max_length: 256,
        request_timeout_secs: 5,
    }
}

fn input() -> ModelInput {
    ModelInput {
        input_data: "1. Time of anomaly: 2024-12-17 00:00:00\n2. Target Name: tp01".to_string(),
        metrics_definition: "\t\t- cpu_usage: CPU in use.\n".to_string(),
    }
}

#[tokio::test]
async fn test_generate_request_shape_and_answer() {
    let server = MockServer::start().await;
    let model_output = json!({
        "inst_type": "os",
        "target_id": "tp01",
        "situation": "CPU usage is rising",
        "issue": "- runaway batch job",
        "solution": "- throttle the batch job",
        "etc": ""
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "qwen2.5:14b-instruct-q8_0",
            "stream": false,
            "format": "json",
            "options": {"temperature": 0.0, "num_predict": 256}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "qwen2.5:14b-instruct-q8_0",
            "response": model_output,
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server, "qwen2.5:14b-instruct-q8_0")).unwrap();
    let answer = client.infer(&input()).await.unwrap();

    assert_eq!(answer.target_id, "tp01");
    assert_eq!(answer.solution, "- throttle the batch job");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("output schema"));
    assert!(prompt.contains("\t\t- cpu_usage: CPU in use."));
    assert!(prompt.ends_with("2. Target Name: tp01"));
}

#[tokio::test]
async fn test_non_qwen_model_gets_inline_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "{\"inst_type\":\"os\",\"target_id\":\"tp01\",\"situation\":\"s\",\"issues\":\"i\",\"solutions\":\"x\"}"
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server, "llama3:8b")).unwrap();
    let answer = client.infer(&input()).await.unwrap();
    assert_eq!(answer.issue, "i");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["prompt"].as_str().unwrap().contains("※ Output Format"));
}

#[tokio::test]
async fn test_server_error_is_inference_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server, "qwen2.5:14b-instruct-q8_0")).unwrap();
    let err = client.infer(&input()).await.unwrap_err();
    assert!(matches!(err, Error::Inference(msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_non_conforming_answer_is_inference_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "{\"answer\": \"the server is fine\"}"
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server, "qwen2.5:14b-instruct-q8_0")).unwrap();
    let err = client.infer(&input()).await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[test]
fn test_base_url_without_scheme() {
    let config = LlmConfig {
        base_url: "gpu01:11434/".to_string(),
        ..LlmConfig::default()
    };
    let client = OllamaClient::new(&config).unwrap();
    assert_eq!(client.endpoint(), "http://gpu01:11434/api/generate");
}
