//! Unit listing endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use ovg_common::model::{DashboardSummary, FilterConfig, OrganizationUnit, SegmentCategory};
use ovg_engine::analysis::apply_filters;

use crate::{ApiError, ApiResult, AppState};

/// Query string of `GET /api/units`; omitted fields take the grid defaults
#[derive(Debug, Default, Deserialize)]
pub struct UnitQuery {
    /// Comma separated category identifiers or labels
    pub categories: Option<String>,
    pub min_headcount: Option<u32>,
    pub show_only_risk: Option<bool>,
}

impl UnitQuery {
    pub fn to_filter(&self) -> ApiResult<FilterConfig> {
        let mut filter = FilterConfig::default();

        if let Some(categories) = &self.categories {
            filter.categories = categories
                .split(',')
                .filter(|c| !c.trim().is_empty())
                .map(|c| c.parse::<SegmentCategory>())
                .collect::<Result<_, _>>()?;
        }
        if let Some(min) = self.min_headcount {
            filter.min_headcount = min;
        }
        if let Some(risk_only) = self.show_only_risk {
            filter.show_only_risk = risk_only;
        }
        Ok(filter)
    }
}

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    let dataset = state.require_dataset().await?;
    Ok(Json(dataset.summary.clone()))
}

/// GET /api/units
pub async fn list_units(
    State(state): State<AppState>,
    Query(query): Query<UnitQuery>,
) -> ApiResult<Json<Vec<OrganizationUnit>>> {
    let filter = query.to_filter()?;
    let dataset = state.require_dataset().await?;

    let units = apply_filters(&dataset.units, &filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(units))
}

/// GET /api/units/:id
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrganizationUnit>> {
    let dataset = state.require_dataset().await?;
    dataset
        .unit(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Unit {}", id)))
}

pub fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/api/summary", get(get_summary))
        .route("/api/units", get(list_units))
        .route("/api/units/:id", get(get_unit))
}
