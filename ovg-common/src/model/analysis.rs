//! Derived analysis records
//!
//! Everything here is ephemeral: built on demand from merged units and never
//! persisted.

use serde::{Deserialize, Serialize};

use super::unit::{OrganizationUnit, SegmentCategory};

/// Why a driver was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverImpact {
    /// A resource factor sits below its benchmark (driven by a deficit)
    Positive,
    /// A burden factor sits above its benchmark (driven by an excess)
    Negative,
}

/// One sub-factor's contribution to a unit's condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Factor name (dimension label)
    pub factor: String,
    /// Fixed correlation-like weight used for ranking
    pub correlation: f64,
    pub impact: DriverImpact,
    pub current_value: f64,
    pub benchmark_value: f64,
    /// current - benchmark
    pub gap: f64,
    /// |gap x correlation|, the ranking key
    pub impact_score: f64,
    pub recommendation: String,
}

/// Driver analysis for one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAnalysis {
    pub unit_id: String,
    pub unit_name: String,
    /// At most `max_drivers`, descending by impact score
    pub top_drivers: Vec<Driver>,
    pub insights: Vec<String>,
}

/// What-if projection for one factor
///
/// `confidence` is a fixed constant, not a fitted estimate. A confidence of 0
/// marks an unknown factor; such a result carries zero deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub factor: String,
    pub original_value: f64,
    pub new_value: f64,
    pub predicted_engagement_change: f64,
    pub predicted_stress_change: f64,
    pub confidence: f64,
}

impl SimulationResult {
    /// Sentinel for a factor missing from the weight table
    pub fn unknown_factor(factor: &str, new_value: f64) -> Self {
        Self {
            factor: factor.to_string(),
            original_value: 0.0,
            new_value,
            predicted_engagement_change: 0.0,
            predicted_stress_change: 0.0,
            confidence: 0.0,
        }
    }

    pub fn is_known_factor(&self) -> bool {
        self.confidence > 0.0
    }
}

/// Trend placeholder; no time series is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Headline figures for the dashboard
///
/// Totals and averages come from the company-wide row of the exports, not
/// from aggregation, so they match the survey vendor's own topline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_headcount: u32,
    pub average_engagement: f64,
    pub average_stress: f64,
    /// Top critical/warning departments, burnout first
    pub critical_units: Vec<OrganizationUnit>,
    /// Top healthy departments by engagement
    pub healthy_units: Vec<OrganizationUnit>,
    pub trend_direction: TrendDirection,
}

/// Population statistics of the two axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub engagement_mean: Option<f64>,
    pub engagement_std: Option<f64>,
    pub stress_mean: Option<f64>,
    pub stress_std: Option<f64>,
}

/// Unit list filter used by the grid view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub categories: Vec<SegmentCategory>,
    pub min_headcount: u32,
    /// Drop healthy and caution units
    pub show_only_risk: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            categories: vec![SegmentCategory::Department],
            min_headcount: 10,
            show_only_risk: false,
        }
    }
}

/// Units of one category against the company-wide baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentComparison {
    pub category: SegmentCategory,
    pub baseline_engagement: f64,
    pub baseline_stress: f64,
    /// Descending by engagement score
    pub units: Vec<OrganizationUnit>,
}
