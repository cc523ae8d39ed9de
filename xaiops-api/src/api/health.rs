//! Health check and liveness endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok", or "degraded" when the queue cannot be read)
    pub status: String,
    /// Module name ("xaiops-api")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Jobs waiting in the Submission Queue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_depth: Option<usize>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let (status, queue_depth) = match state.queue.len().await {
        Ok(depth) => ("ok", Some(depth)),
        Err(e) => {
            tracing::warn!(error = %e, "Queue depth unavailable");
            ("degraded", None)
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        module: "xaiops-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        queue_depth,
    })
}

async fn root() -> &'static str {
    "Hello, XAIOps!"
}

async fn ping() -> &'static str {
    "Pong!"
}

async fn hello(Path(name): Path<String>) -> String {
    format!("Hello, {}", name)
}

async fn status() -> &'static str {
    "server is running smoothly."
}

/// Build health check and liveness routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/hello/:name", get(hello))
        .route("/status", get(status))
        .route("/health", get(health_check))
}
