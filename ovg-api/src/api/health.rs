//! Health and status endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::buildinfo::get_build_info;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "ovg-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Service status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Seconds since service started
    pub uptime_seconds: u64,
    pub dataset_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    pub unit_count: usize,
    /// Last load failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let dataset = state.current_dataset().await;

    Json(StatusResponse {
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        dataset_loaded: dataset.is_some(),
        dataset_id: dataset.as_ref().map(|d| d.id),
        loaded_at: dataset.as_ref().map(|d| d.loaded_at),
        unit_count: dataset.as_ref().map(|d| d.units.len()).unwrap_or(0),
        last_error: state.last_error.read().await.clone(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/status", get(get_status))
        .route("/api/buildinfo", get(get_build_info))
}
