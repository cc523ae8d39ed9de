//! Model input construction over a fake metric source

mod helpers;

use std::collections::HashMap;
use std::sync::Arc;

use helpers::*;
use xaiops_common::{AnalysisRequest, Error};
use xaiops_consumer::metrics::{Baseline, MetricSample};
use xaiops_consumer::prompt::glossary::UNKNOWN_DEFINITION;
use xaiops_consumer::prompt::{BuildModelInput, PromptBuilder};

fn make_builder(source: FakeMetricSource) -> (PromptBuilder, Arc<FakeMetricSource>) {
    let source = Arc::new(source);
    (PromptBuilder::new(source.clone()), source)
}

#[tokio::test]
async fn test_host_input_with_baselines() {
    let mut baselines = HashMap::new();
    baselines.insert(
        "cpu_usage".to_string(),
        Baseline {
            lower: Some(0.0),
            upper: Some(42.5),
            avg: Some(20.0),
            std: Some(4.0),
        },
    );
    let (builder, source) = make_builder(FakeMetricSource {
        samples: vec![
            MetricSample::new("cpu_usage", Some(97.25)),
            MetricSample::new("custom_gauge", None),
        ],
        baselines,
        ..Default::default()
    });

    let input = builder
        .build(&host_request("2024-12-17 00:00:00", "tp01"))
        .await
        .unwrap();

    assert!(input.input_data.starts_with(
        "1. Time of anomaly: 2024-12-17 00:00:00\n2. Target Name: tp01\n3. Instance type of anomaly: os\n"
    ));
    assert!(input.input_data.contains(
        " 4.1. cpu_usage: The predicted allowable range is 0.0 to 42.5, the average value is 20.0, and the current actual value is 97.25."
    ));
    assert!(input.input_data.contains(
        " 4.2. custom_gauge: The predicted allowable range is unknown to unknown, the average value is unknown, and the current actual value is unknown."
    ));
    assert!(input.metrics_definition.starts_with("\t\t- cpu_usage: "));
    assert!(input
        .metrics_definition
        .contains(&format!("\t\t- custom_gauge: {}\n", UNKNOWN_DEFINITION)));

    let seen = source.seen_targets.lock().unwrap().clone();
    assert_eq!(seen, vec![("os".to_string(), "tp01".to_string())]);
}

#[tokio::test]
async fn test_service_input_uses_descriptions_and_tx_name() {
    let mut descriptions = HashMap::new();
    descriptions.insert("elapse_avg".to_string(), "E2E elapsed (avg)".to_string());
    let (builder, source) = make_builder(FakeMetricSource {
        samples: vec![
            MetricSample::new("elapse_avg", Some(12381.74)),
            MetricSample::new("elapse08_avg", Some(176.46)),
        ],
        descriptions,
        ..Default::default()
    });

    let input = builder
        .build(&service_request("2025-03-10 20:13:00", "8"))
        .await
        .unwrap();

    assert!(input.input_data.contains("2. Target Name: card-issue\n"));
    assert!(input.input_data.contains("3. Instance type of anomaly: service\n"));
    assert!(input.input_data.contains(" 4.1. E2E elapsed (avg): "));
    assert!(input.input_data.contains(" 4.2. elapse08_avg: "));
    assert!(input
        .metrics_definition
        .starts_with("\t\t- E2E elapsed (avg): Average end-to-end elapsed time"));

    let seen = source.seen_targets.lock().unwrap().clone();
    assert_eq!(seen, vec![("service".to_string(), "8".to_string())]);
}

#[tokio::test]
async fn test_data_access_errors_fail_soft() {
    let (builder, _) = make_builder(FakeMetricSource {
        fail_metrics: true,
        ..Default::default()
    });
    let input = builder
        .build(&host_request("2024-12-17 00:00:00", "tp01"))
        .await
        .unwrap();
    assert!(input.input_data.ends_with("4. Anomalous metrics:"));
    assert_eq!(input.metrics_definition, "");

    let (builder, _) = make_builder(FakeMetricSource {
        samples: vec![MetricSample::new("elapse_avg", Some(1.5))],
        fail_baselines: true,
        fail_descriptions: true,
        ..Default::default()
    });
    let input = builder
        .build(&service_request("2025-03-10 20:13:00", "8"))
        .await
        .unwrap();
    assert!(input.input_data.contains(
        " 4.1. elapse_avg: The predicted allowable range is unknown to unknown, the average value is unknown, and the current actual value is 1.5."
    ));
}

#[tokio::test]
async fn test_structural_problems_are_enrichment_errors() {
    let (builder, _) = make_builder(FakeMetricSource::default());

    let err = builder
        .build(&host_request("12/17/2024", "tp01"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Enrichment(_)));

    let mut request = host_request("2024-12-17 00:00:00", "tp01");
    if let AnalysisRequest::HostInstanceDb(req) = &mut request {
        req.summary.tiers[0].instances.clear();
    }
    let err = builder.build(&request).await.unwrap_err();
    assert!(matches!(err, Error::Enrichment(_)));
}
