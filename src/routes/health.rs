//! Health check endpoints
//!
//! - /health - Liveness probe, 200 while the process is serving
//! - /ready - Readiness probe, 200 only while the store answers a ping

use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::{json_response, FullBody};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Handle liveness probe (/health)
pub fn health_check() -> Response<FullBody> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            healthy: true,
            status: "OK",
            version: env!("CARGO_PKG_VERSION"),
            error: None,
        },
    )
}

/// Handle readiness probe (/ready)
pub async fn readiness_check(state: Arc<AppState>) -> Response<FullBody> {
    match state.store.ping().await {
        Ok(()) => health_check(),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                &HealthResponse {
                    healthy: false,
                    status: "UNAVAILABLE",
                    version: env!("CARGO_PKG_VERSION"),
                    error: Some(e.to_string()),
                },
            )
        }
    }
}
