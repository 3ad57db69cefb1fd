//! Liveness probe.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;
use declara_core::declaration::ReportingPeriod;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `healthy` when the process answers.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Period open for data entry.
    pub reporting: ReportingPeriod,
    /// False once the deadline has passed.
    pub reporting_open: bool,
}

/// GET `/health`
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        reporting: state.period,
        reporting_open: !state.period.is_closed(Utc::now()),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
