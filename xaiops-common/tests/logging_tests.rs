//! File logging (installs the global subscriber, so one test per binary)

use xaiops_common::config::LoggingConfig;
use xaiops_common::logging::{init_logging, log_file_path};

#[test]
fn test_directory_receives_component_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig {
        level: "info".to_string(),
        directory: Some(dir.path().join("logs")),
    };

    let guard = init_logging("consumer", &config).unwrap();
    assert!(guard.is_some());

    tracing::error!(key = "2024-12-17 00:00:00_tiers_os_tp01", "Job failed");
    drop(guard);

    let path = log_file_path(&dir.path().join("logs"), "consumer");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Job failed"));
    assert!(content.contains("2024-12-17 00:00:00_tiers_os_tp01"));
    assert!(!content.contains("\u{1b}["), "file output must not carry ANSI colors");
}
