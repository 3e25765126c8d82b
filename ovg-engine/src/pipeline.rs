//! Load-and-merge pipeline
//!
//! Each load builds a fresh, immutable [`Dataset`] from the two exports.
//! Nothing is shared with earlier loads; callers replace their dataset
//! wholesale.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use ovg_common::model::{
    DashboardSummary, EngagementDetails, OrganizationUnit, StressDetails,
};
use ovg_common::{AnalysisConfig, Error, Result};

use crate::analysis::{find_overall, generate_dashboard_summary, Classifier};
use crate::ingest::{merge, normalize_rows, MergeReport, NormalizeReport, TabularParser};

/// Per-stage diagnostics of one load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub engagement: NormalizeReport,
    pub stress: NormalizeReport,
    pub merge: MergeReport,
}

/// One loaded, merged and summarized survey pair
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    /// Merged units in engagement-export order
    pub units: Vec<OrganizationUnit>,
    /// The company-wide unit, if the exports carry one
    pub overall: Option<OrganizationUnit>,
    pub summary: DashboardSummary,
    pub report: LoadReport,
}

impl Dataset {
    pub fn unit(&self, id: &str) -> Option<&OrganizationUnit> {
        self.units.iter().find(|u| u.id == id)
    }
}

/// Parse, normalize and merge two export texts
pub fn merge_texts(
    engagement_text: &str,
    stress_text: &str,
    config: &AnalysisConfig,
) -> Result<(Vec<OrganizationUnit>, LoadReport)> {
    let parser = TabularParser::new();

    let (engagement, engagement_report) =
        normalize_rows::<EngagementDetails>(&parser.parse(engagement_text), config)?;
    let (stress, stress_report) =
        normalize_rows::<StressDetails>(&parser.parse(stress_text), config)?;

    let (units, merge_report) = merge(&engagement, &stress, &Classifier::from_config(config));

    Ok((
        units,
        LoadReport {
            engagement: engagement_report,
            stress: stress_report,
            merge: merge_report,
        },
    ))
}

/// Build a dataset from two export texts
pub fn load_from_text(
    engagement_text: &str,
    stress_text: &str,
    config: &AnalysisConfig,
) -> Result<Dataset> {
    let (units, report) = merge_texts(engagement_text, stress_text, config)?;
    let overall = find_overall(&units).cloned();
    let summary = generate_dashboard_summary(&units, config.summary_top_n);

    let dataset = Dataset {
        id: Uuid::new_v4(),
        loaded_at: Utc::now(),
        units,
        overall,
        summary,
        report,
    };
    info!(
        dataset = %dataset.id,
        units = dataset.units.len(),
        has_overall = dataset.overall.is_some(),
        "Dataset built"
    );
    Ok(dataset)
}

/// Build a dataset from two export files, read concurrently
pub async fn load_from_files(
    engagement_path: &Path,
    stress_path: &Path,
    config: &AnalysisConfig,
) -> Result<Dataset> {
    let (engagement_text, stress_text) = tokio::try_join!(
        read_export(engagement_path),
        read_export(stress_path)
    )?;
    load_from_text(&engagement_text, &stress_text, config)
}

async fn read_export(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}
