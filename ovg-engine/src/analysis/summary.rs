//! Summary Aggregator
//!
//! Headline numbers, grouping, statistics, segment comparison and the grid
//! filter. All functions are pure over a merged unit slice.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ovg_common::model::{
    DashboardSummary, FilterConfig, OrganizationUnit, Quadrant, RiskLevel, ScoreStatistics,
    SegmentCategory, SegmentComparison, TrendDirection,
};
use ovg_common::AnalysisConfig;

/// The company-wide unit: category overall and a name containing its label
pub fn find_overall(units: &[OrganizationUnit]) -> Option<&OrganizationUnit> {
    units.iter().find(|u| {
        u.category == SegmentCategory::Overall && u.name.contains(SegmentCategory::Overall.label())
    })
}

/// Descending comparison with null treated as 0
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(0.0).total_cmp(&a.unwrap_or(0.0))
}

/// Dashboard headline
///
/// Totals come from the overall unit (zero when absent). Ranked lists only
/// consider departments.
pub fn generate_dashboard_summary(units: &[OrganizationUnit], top_n: usize) -> DashboardSummary {
    let overall = find_overall(units);
    let departments = units
        .iter()
        .filter(|u| u.category == SegmentCategory::Department);

    let mut critical_units: Vec<OrganizationUnit> = departments
        .clone()
        .filter(|u| u.risk_level.is_at_risk())
        .cloned()
        .collect();
    // Burnout first, then highest stress
    critical_units.sort_by(|a, b| {
        let a_burnout = a.quadrant == Quadrant::Burnout;
        let b_burnout = b.quadrant == Quadrant::Burnout;
        b_burnout
            .cmp(&a_burnout)
            .then_with(|| descending(a.stress_score, b.stress_score))
    });
    critical_units.truncate(top_n);

    let mut healthy_units: Vec<OrganizationUnit> = departments
        .filter(|u| u.risk_level == RiskLevel::Healthy)
        .cloned()
        .collect();
    healthy_units.sort_by(|a, b| descending(a.engagement_score, b.engagement_score));
    healthy_units.truncate(top_n);

    DashboardSummary {
        total_headcount: overall.map(|u| u.headcount).unwrap_or(0),
        average_engagement: overall.and_then(|u| u.engagement_score).unwrap_or(0.0),
        average_stress: overall.and_then(|u| u.stress_score).unwrap_or(0.0),
        critical_units,
        healthy_units,
        trend_direction: TrendDirection::Stable,
    }
}

/// Units per category, each group in merge order
pub fn group_by_category(
    units: &[OrganizationUnit],
) -> BTreeMap<SegmentCategory, Vec<&OrganizationUnit>> {
    let mut groups: BTreeMap<SegmentCategory, Vec<&OrganizationUnit>> = BTreeMap::new();
    for unit in units {
        groups.entry(unit.category).or_default().push(unit);
    }
    groups
}

/// Population mean and standard deviation over non-null scores
pub fn calculate_statistics(units: &[OrganizationUnit]) -> ScoreStatistics {
    let engagement: Vec<f64> = units.iter().filter_map(|u| u.engagement_score).collect();
    let stress: Vec<f64> = units.iter().filter_map(|u| u.stress_score).collect();

    ScoreStatistics {
        engagement_mean: mean(&engagement),
        engagement_std: std_dev(&engagement),
        stress_mean: mean(&stress),
        stress_std: std_dev(&stress),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// One category's units against the company-wide baseline
///
/// Without an overall score the classification thresholds stand in as the
/// baseline.
pub fn segment_comparison(
    units: &[OrganizationUnit],
    category: SegmentCategory,
    config: &AnalysisConfig,
) -> SegmentComparison {
    let overall = find_overall(units);

    let mut members: Vec<OrganizationUnit> = units
        .iter()
        .filter(|u| u.category == category)
        .cloned()
        .collect();
    members.sort_by(|a, b| descending(a.engagement_score, b.engagement_score));

    SegmentComparison {
        category,
        baseline_engagement: overall
            .and_then(|u| u.engagement_score)
            .unwrap_or(config.engagement_threshold),
        baseline_stress: overall
            .and_then(|u| u.stress_score)
            .unwrap_or(config.stress_threshold),
        units: members,
    }
}

/// Grid view filter: category membership, minimum headcount, risk only
pub fn apply_filters<'a>(
    units: &'a [OrganizationUnit],
    filter: &FilterConfig,
) -> Vec<&'a OrganizationUnit> {
    units
        .iter()
        .filter(|u| filter.categories.contains(&u.category))
        .filter(|u| u.headcount >= filter.min_headcount)
        .filter(|u| !filter.show_only_risk || u.risk_level.is_at_risk())
        .collect()
}
