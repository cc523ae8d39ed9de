//! HTTP API handlers for xaiops-api

pub mod answer;
pub mod health;
pub mod process;

pub use answer::answer_routes;
pub use health::health_routes;
pub use process::{process_routes, retry_message};
