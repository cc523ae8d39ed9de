//! Shared fakes and fixtures for consumer tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::json;
use xaiops_common::store::MemoryResultStore;
use xaiops_common::queue::MemoryQueue;
use xaiops_common::{build_key, AnalysisRequest, Error, Job, ResultRecord, ResultStore, Result};
use xaiops_consumer::inference::{InferenceClient, LlmAnswer};
use xaiops_consumer::metrics::{Baseline, MetricSample, MetricSource, MetricTarget};
use xaiops_consumer::prompt::{BuildModelInput, ModelInput};
use xaiops_consumer::{WorkerDeps, WorkerSettings};

pub fn host_request(time: &str, target_id: &str) -> AnalysisRequest {
    AnalysisRequest::from_value(json!({
        "summary": {
            "time": time,
            "anomaly": true,
            "tx_codes": {},
            "anomalyCountMap": {"os": 1, "was": 0, "tran": 0, "db": 0},
            "tiers": [{
                "name": "MCI",
                "type": "os",
                "instances": [{
                    "status": "critical", "metric": "cpu_usage", "normalityScore": 0.2,
                    "target_id": target_id, "instance_name": format!("{}-host", target_id)
                }]
            }]
        },
        "nav": null
    }))
    .unwrap()
}

pub fn service_request(time: &str, tx_code: &str) -> AnalysisRequest {
    AnalysisRequest::from_value(json!({
        "time": time,
        "anomaly": true,
        "tx_codes": {
            tx_code: {
                "name": "card-issue",
                "performance": {"lower": 0.0, "upper": 79.41, "elapse_avg": 12381.74, "exec_count": 151},
                "anomaly": []
            }
        },
        "tiers": []
    }))
    .unwrap()
}

pub fn job(request: AnalysisRequest) -> Job {
    let key = build_key(&request).unwrap();
    Job::new(key, request)
}

pub fn answer_for(input: &ModelInput) -> LlmAnswer {
    LlmAnswer {
        inst_type: "os".to_string(),
        target_id: "from-fake".to_string(),
        situation: format!("saw {} bytes of input", input.input_data.len()),
        issue: "- something".to_string(),
        solution: "- fix it".to_string(),
        etc: String::new(),
    }
}

// ============================================================================
// Fake collaborators
// ============================================================================

/// Metric source backed by fixed maps; `fail_*` switches force errors
#[derive(Default)]
pub struct FakeMetricSource {
    pub samples: Vec<MetricSample>,
    pub baselines: HashMap<String, Baseline>,
    pub descriptions: HashMap<String, String>,
    pub fail_metrics: bool,
    pub fail_baselines: bool,
    pub fail_descriptions: bool,
    pub seen_targets: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MetricSource for FakeMetricSource {
    async fn metrics(&self, _time: NaiveDateTime, target: MetricTarget<'_>) -> Result<Vec<MetricSample>> {
        self.seen_targets
            .lock()
            .unwrap()
            .push((target.inst_type().to_string(), target.id().to_string()));
        if self.fail_metrics {
            return Err(Error::Internal("database unavailable".to_string()));
        }
        Ok(self.samples.clone())
    }

    async fn baseline(
        &self,
        _time: NaiveDateTime,
        metric: &str,
        _target: MetricTarget<'_>,
    ) -> Result<Option<Baseline>> {
        if self.fail_baselines {
            return Err(Error::Internal("baseline store unavailable".to_string()));
        }
        Ok(self.baselines.get(metric).copied())
    }

    async fn metric_descriptions(&self, metrics: &[String]) -> Result<HashMap<String, String>> {
        if self.fail_descriptions {
            return Err(Error::Internal("database unavailable".to_string()));
        }
        Ok(metrics
            .iter()
            .filter_map(|m| self.descriptions.get(m).map(|d| (m.clone(), d.clone())))
            .collect())
    }
}

/// Input builder that fails for requests at a chosen time
pub struct FakeInput {
    pub fail_time: Option<String>,
}

#[async_trait]
impl BuildModelInput for FakeInput {
    async fn build(&self, request: &AnalysisRequest) -> Result<ModelInput> {
        if self.fail_time.as_deref() == Some(request.time()) {
            return Err(Error::Enrichment("Invalid anomaly time".to_string()));
        }
        Ok(ModelInput {
            input_data: format!("1. Time of anomaly: {}", request.time()),
            metrics_definition: String::new(),
        })
    }
}

/// Inference client that records inputs; fails when input mentions `fail_on`
/// and panics when it mentions `panic_on`
#[derive(Default)]
pub struct FakeInference {
    pub fail_on: Option<String>,
    pub panic_on: Option<String>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<ModelInput>>,
}

impl FakeInference {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceClient for FakeInference {
    async fn infer(&self, input: &ModelInput) -> Result<LlmAnswer> {
        self.calls.lock().unwrap().push(input.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(marker) = &self.panic_on {
            if input.input_data.contains(marker.as_str()) {
                panic!("inference backend blew up");
            }
        }
        match &self.fail_on {
            Some(marker) if input.input_data.contains(marker.as_str()) => {
                Err(Error::Inference("model returned garbage".to_string()))
            }
            _ => Ok(answer_for(input)),
        }
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub queue: Arc<MemoryQueue>,
    pub store: Arc<MemoryResultStore>,
    pub inference: Arc<FakeInference>,
    pub deps: WorkerDeps,
}

pub fn harness(input: Arc<dyn BuildModelInput>, inference: FakeInference) -> Harness {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryResultStore::new());
    let inference = Arc::new(inference);
    let deps = WorkerDeps {
        queue: queue.clone(),
        store: store.clone(),
        input,
        inference: inference.clone(),
    };
    Harness {
        queue,
        store,
        inference,
        deps,
    }
}

pub fn fast_settings() -> WorkerSettings {
    WorkerSettings {
        pop_timeout: Duration::from_secs(1),
        cooldown: Duration::from_millis(10),
    }
}

/// Sample the store until `key` is terminal (paused-clock friendly)
pub async fn wait_terminal(store: &MemoryResultStore, job: &Job) -> ResultRecord {
    for _ in 0..600 {
        let record = store.get(&job.correlation_key).await.unwrap();
        if record.status.is_terminal() {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("{} never reached a terminal status", job.correlation_key);
}
