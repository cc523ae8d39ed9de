//! Build Model Input
//!
//! Turns an [`AnalysisRequest`] into the natural-language input block and the
//! metric-definitions block the inference prompt is assembled from.
//!
//! **Algorithm:**
//! 1. Resolve the target (first tier/instance, or first tx code)
//! 2. Fetch metric values at the anomaly time
//! 3. For each metric, fetch its baseline range
//! 4. (service) Map metric ids to display descriptions
//! 5. Render both blocks
//!
//! Steps 2-4 fail soft: a data-access error is logged and treated as "no data",
//! so an empty metrics section still produces a prompt. Only structural
//! problems with the request itself are errors.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use xaiops_common::models::{HostInstanceDbRequest, ServiceRequest};
use xaiops_common::{AnalysisRequest, Error, Result};

use crate::metrics::{parse_time, Baseline, MetricSample, MetricSource, MetricTarget};

pub mod glossary;
pub mod templates;

pub use templates::MetricLine;

/// Rendered model input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    pub input_data: String,
    pub metrics_definition: String,
}

#[async_trait]
pub trait BuildModelInput: Send + Sync {
    async fn build(&self, request: &AnalysisRequest) -> Result<ModelInput>;
}

/// [`BuildModelInput`] backed by a [`MetricSource`]
pub struct PromptBuilder {
    source: Arc<dyn MetricSource>,
}

impl PromptBuilder {
    pub fn new(source: Arc<dyn MetricSource>) -> Self {
        Self { source }
    }

    async fn build_host(&self, req: &HostInstanceDbRequest) -> Result<ModelInput> {
        let tier = req
            .first_tier()
            .ok_or_else(|| Error::Enrichment("Request has no tiers".to_string()))?;
        let instance = tier
            .instances
            .first()
            .ok_or_else(|| Error::Enrichment("First tier has no instances".to_string()))?;
        let time = parse_time(&req.summary.time)?;
        let target = MetricTarget::Instance {
            inst_type: &tier.tier_type,
            target_id: &instance.target_id,
        };

        let samples = self.fetch_metrics(time, target).await;
        let mut lines = Vec::with_capacity(samples.len());
        let mut definitions = Vec::with_capacity(samples.len());
        for sample in samples {
            let baseline = self.fetch_baseline(time, &sample.metric, target).await;
            definitions.push((
                sample.metric.clone(),
                glossary::definition(&sample.metric).to_string(),
            ));
            lines.push(metric_line(sample.metric, sample.real_value, baseline));
        }

        Ok(ModelInput {
            input_data: templates::render_input_data(
                &req.summary.time,
                &instance.target_id,
                &tier.tier_type,
                &lines,
            ),
            metrics_definition: templates::render_metrics_definition(&definitions),
        })
    }

    async fn build_service(&self, req: &ServiceRequest) -> Result<ModelInput> {
        let (tx_code, tx) = req
            .tx_codes
            .first()
            .ok_or_else(|| Error::Enrichment("Request has no tx_codes".to_string()))?;
        let time = parse_time(&req.time)?;
        let target = MetricTarget::Service { tx_code };

        let samples = self.fetch_metrics(time, target).await;
        let names: Vec<String> = samples.iter().map(|s| s.metric.clone()).collect();
        let descriptions = match self.source.metric_descriptions(&names).await {
            Ok(descriptions) => descriptions,
            Err(e) => {
                warn!(tx_code, error = %e, "Metric description lookup failed");
                Default::default()
            }
        };

        let mut lines = Vec::with_capacity(samples.len());
        let mut definitions = Vec::with_capacity(samples.len());
        for sample in samples {
            let baseline = self.fetch_baseline(time, &sample.metric, target).await;
            let display = descriptions
                .get(&sample.metric)
                .cloned()
                .unwrap_or_else(|| sample.metric.clone());
            definitions.push((
                display.clone(),
                glossary::definition(&sample.metric).to_string(),
            ));
            lines.push(metric_line(display, sample.real_value, baseline));
        }

        Ok(ModelInput {
            input_data: templates::render_input_data(&req.time, &tx.name, "service", &lines),
            metrics_definition: templates::render_metrics_definition(&definitions),
        })
    }

    async fn fetch_metrics(&self, time: NaiveDateTime, target: MetricTarget<'_>) -> Vec<MetricSample> {
        match self.source.metrics(time, target).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!(
                    inst_type = target.inst_type(),
                    target = target.id(),
                    error = %e,
                    "Metric fetch failed, continuing without metrics"
                );
                Vec::new()
            }
        }
    }

    async fn fetch_baseline(
        &self,
        time: NaiveDateTime,
        metric: &str,
        target: MetricTarget<'_>,
    ) -> Option<Baseline> {
        match self.source.baseline(time, metric, target).await {
            Ok(baseline) => baseline,
            Err(e) => {
                warn!(metric, target = target.id(), error = %e, "Baseline fetch failed");
                None
            }
        }
    }
}

#[async_trait]
impl BuildModelInput for PromptBuilder {
    async fn build(&self, request: &AnalysisRequest) -> Result<ModelInput> {
        let input = match request {
            AnalysisRequest::HostInstanceDb(req) => self.build_host(req).await?,
            AnalysisRequest::Service(req) => self.build_service(req).await?,
        };
        debug!(category = %request.category(), input_data = %input.input_data, "Built model input");
        Ok(input)
    }
}

fn metric_line(name: String, real_value: Option<f64>, baseline: Option<Baseline>) -> MetricLine {
    let baseline = baseline.unwrap_or_default();
    MetricLine {
        name,
        lower: baseline.lower,
        upper: baseline.upper,
        avg: baseline.avg,
        real_value,
    }
}
