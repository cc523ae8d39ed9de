//! # XAIOps API
//!
//! HTTP front end of the anomaly explanation service. Requests are admitted
//! through the [`AdmissionGate`](admission::AdmissionGate), queued for the
//! workers, and answered once the [`Poller`](poller::Poller) sees a terminal
//! status.

pub mod admission;
pub mod api;
pub mod error;
pub mod poller;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use xaiops_common::config::PollConfig;
use xaiops_common::{Backends, ResultStore, SubmissionQueue};

use crate::admission::AdmissionGate;
use crate::poller::Poller;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResultStore>,
    pub queue: Arc<dyn SubmissionQueue>,
    pub gate: AdmissionGate,
    pub poller: Poller,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(backends: Backends, poll: &PollConfig) -> Self {
        let Backends { store, queue } = backends;
        Self {
            gate: AdmissionGate::new(store.clone(), queue.clone()),
            poller: Poller::from_config(store.clone(), poll),
            store,
            queue,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Analysis routes live under `/llm`; liveness routes at the root. CORS is
/// fully permissive for the browser dashboard.
pub fn build_router(state: AppState) -> Router {
    let llm = Router::new()
        .merge(api::process_routes())
        .merge(api::answer_routes());

    Router::new()
        .nest("/llm", llm)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
