//! Per-unit analysis and dataset-wide statistics endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use ovg_common::model::{
    DriverAnalysis, ScoreStatistics, SegmentCategory, SegmentComparison, SimulationResult,
};
use ovg_common::FactorTable;
use ovg_engine::analysis::{calculate_statistics, segment_comparison};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub factor: String,
    pub target: f64,
}

/// GET /api/units/:id/drivers
pub async fn get_drivers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DriverAnalysis>> {
    let dataset = state.require_dataset().await?;
    let unit = dataset
        .unit(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Unit {}", id)))?;

    Ok(Json(state.analyzer.analyze(unit)))
}

/// POST /api/units/:id/simulate
///
/// An unknown factor is not an error: the result carries confidence 0.
pub async fn simulate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SimulateRequest>,
) -> ApiResult<Json<SimulationResult>> {
    if !request.target.is_finite() {
        return Err(ApiError::BadRequest("target must be a finite number".to_string()));
    }

    let dataset = state.require_dataset().await?;
    let unit = dataset
        .unit(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Unit {}", id)))?;

    Ok(Json(state.simulator.simulate(unit, &request.factor, request.target)))
}

/// GET /api/statistics
pub async fn get_statistics(State(state): State<AppState>) -> ApiResult<Json<ScoreStatistics>> {
    let dataset = state.require_dataset().await?;
    Ok(Json(calculate_statistics(&dataset.units)))
}

/// GET /api/segments/:category
pub async fn get_segment(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<SegmentComparison>> {
    let category: SegmentCategory = category.parse()?;
    let dataset = state.require_dataset().await?;

    Ok(Json(segment_comparison(&dataset.units, category, &state.config)))
}

/// GET /api/factors
pub async fn get_factors(State(state): State<AppState>) -> Json<FactorTable> {
    Json(state.config.factors.clone())
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/units/:id/drivers", get(get_drivers))
        .route("/api/units/:id/simulate", post(simulate))
        .route("/api/statistics", get(get_statistics))
        .route("/api/segments/:category", get(get_segment))
        .route("/api/factors", get(get_factors))
}
