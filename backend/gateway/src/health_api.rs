//! Gateway Health API

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model: String,
    pub uptime_seconds: i64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let now = Utc::now();
    Json(HealthReport {
        status: "ok",
        service: "ocrelay",
        version: env!("CARGO_PKG_VERSION"),
        model: state.extractor.model().to_string(),
        uptime_seconds: (now - state.started_at).num_seconds(),
        timestamp: now,
    })
}
