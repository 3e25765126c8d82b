//! Dataset lifecycle endpoints
//!
//! POST replaces the current dataset wholesale; DELETE clears it. A failed
//! upload leaves the previous dataset in place and is remembered as the
//! service's last error.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use ovg_common::model::DashboardSummary;
use ovg_engine::{load_from_text, LoadReport};

use crate::{ApiError, ApiResult, AppState};

/// Upload body: raw text of both exports
#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    pub engagement_csv: String,
    pub stress_csv: String,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub dataset_id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub unit_count: usize,
    pub report: LoadReport,
    pub summary: DashboardSummary,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// POST /api/dataset
pub async fn load_dataset(
    State(state): State<AppState>,
    Json(request): Json<LoadRequest>,
) -> ApiResult<(StatusCode, Json<LoadResponse>)> {
    let config = state.config.clone();
    let result = tokio::task::spawn_blocking(move || {
        load_from_text(&request.engagement_csv, &request.stress_csv, &config)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Dataset load task failed: {}", e)))?;

    let dataset = match result {
        Ok(dataset) => dataset,
        Err(e) => {
            warn!("Dataset upload rejected: {}", e);
            state.record_error(e.to_string()).await;
            return Err(e.into());
        }
    };

    let dataset = state.replace_dataset(dataset).await;
    Ok((
        StatusCode::CREATED,
        Json(LoadResponse {
            dataset_id: dataset.id,
            loaded_at: dataset.loaded_at,
            unit_count: dataset.units.len(),
            report: dataset.report.clone(),
            summary: dataset.summary.clone(),
        }),
    ))
}

/// DELETE /api/dataset
pub async fn clear_dataset(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse {
        cleared: state.clear_dataset().await,
    })
}

pub fn dataset_routes() -> Router<AppState> {
    Router::new().route("/api/dataset", post(load_dataset).delete(clear_dataset))
}
