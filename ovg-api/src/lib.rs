//! ovg-api library - HTTP boundary of the vitality grid
//!
//! Holds the one loaded [`Dataset`] and exposes it, and the analyses over
//! it, as JSON. A dataset is created on upload, replaced wholesale by the
//! next upload and dropped on explicit clear; handlers only ever see a
//! complete dataset.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

use ovg_common::AnalysisConfig;
use ovg_engine::{Dataset, DriverAnalyzer, SimulationEngine};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Current dataset; `None` until the first upload or after a clear
    pub dataset: Arc<RwLock<Option<Arc<Dataset>>>>,
    /// Tunables every load and analysis runs with
    pub config: Arc<AnalysisConfig>,
    pub analyzer: Arc<DriverAnalyzer>,
    pub simulator: Arc<SimulationEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last load failure, shown to the user until the next successful load
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(None)),
            analyzer: Arc::new(DriverAnalyzer::from_config(&config)),
            simulator: Arc::new(SimulationEngine::from_config(&config)),
            config: Arc::new(config),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Swap in a new dataset; returns the shared handle
    pub async fn replace_dataset(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        let previous = self.dataset.write().await.replace(Arc::clone(&dataset));
        *self.last_error.write().await = None;

        let replaced = previous.map(|d| d.id);
        info!(
            dataset = %dataset.id,
            replaced = ?replaced,
            units = dataset.units.len(),
            "Dataset replaced"
        );
        dataset
    }

    /// Drop the current dataset; returns whether one was loaded
    pub async fn clear_dataset(&self) -> bool {
        let previous = self.dataset.write().await.take();
        if let Some(dataset) = &previous {
            info!(dataset = %dataset.id, "Dataset cleared");
        }
        previous.is_some()
    }

    pub async fn current_dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.read().await.clone()
    }

    /// Current dataset, or 404 when nothing is loaded
    pub async fn require_dataset(&self) -> ApiResult<Arc<Dataset>> {
        self.current_dataset()
            .await
            .ok_or_else(|| ApiError::NotFound("No dataset loaded".to_string()))
    }

    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::dataset_routes())
        .merge(api::unit_routes())
        .merge(api::analysis_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
