//! Merge Engine
//!
//! Inner join of the two partial maps on composite key. The engagement side
//! drives iteration order and is the authority for category, name and
//! headcount; a key missing from either side is skipped, never an error.

use serde::Serialize;
use tracing::{debug, info};

use ovg_common::model::{EngagementDetails, OrganizationUnit, StressDetails};

use super::normalizer::PartialMap;
use crate::analysis::Classifier;

/// Join diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub merged: usize,
    /// Keys present only in the engagement export
    pub unmatched_engagement: Vec<String>,
    /// Keys present only in the stress export
    pub unmatched_stress: Vec<String>,
}

/// Join, classify and emit units in engagement-map order
pub fn merge(
    engagement: &PartialMap<EngagementDetails>,
    stress: &PartialMap<StressDetails>,
    classifier: &Classifier,
) -> (Vec<OrganizationUnit>, MergeReport) {
    let mut units = Vec::with_capacity(engagement.len().min(stress.len()));
    let mut report = MergeReport::default();

    for eng in engagement.iter() {
        let Some(st) = stress.get(&eng.id) else {
            debug!(key = %eng.id, "No stress row for engagement key, skipping");
            report.unmatched_engagement.push(eng.id.clone());
            continue;
        };

        let (quadrant, risk_level) = classifier.classify(eng.score, st.score);
        units.push(OrganizationUnit {
            id: eng.id.clone(),
            category: eng.category,
            name: eng.name.clone(),
            headcount: eng.headcount,
            engagement_score: eng.score,
            stress_score: st.score,
            engagement: eng.details.clone(),
            stress: st.details.clone(),
            risk_level,
            quadrant,
        });
    }

    report.unmatched_stress = stress
        .keys()
        .filter(|key| !engagement.contains_key(key))
        .map(str::to_string)
        .collect();
    report.merged = units.len();

    info!(
        merged = report.merged,
        unmatched_engagement = report.unmatched_engagement.len(),
        unmatched_stress = report.unmatched_stress.len(),
        "Merged survey exports"
    );
    (units, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalizer::PartialUnit;
    use ovg_common::model::{Quadrant, RiskLevel, SegmentCategory};

    fn eng(name: &str, headcount: u32, score: Option<f64>) -> PartialUnit<EngagementDetails> {
        PartialUnit {
            id: format!("部署_{}", name),
            category: SegmentCategory::Department,
            name: name.to_string(),
            headcount,
            line: 2,
            score,
            details: EngagementDetails::default(),
        }
    }

    fn st(name: &str, headcount: u32, score: Option<f64>) -> PartialUnit<StressDetails> {
        PartialUnit {
            id: format!("部署_{}", name),
            category: SegmentCategory::Department,
            name: name.to_string(),
            headcount,
            line: 2,
            score,
            details: StressDetails::default(),
        }
    }

    #[test]
    fn test_inner_join_skips_one_sided_keys() {
        let mut engagement = PartialMap::new();
        engagement.insert(eng("Sales", 50, Some(3.5)));
        engagement.insert(eng("OnlyEngagement", 20, Some(3.0)));
        let mut stress = PartialMap::new();
        stress.insert(st("OnlyStress", 20, Some(2.0)));
        stress.insert(st("Sales", 50, Some(2.8)));

        let (units, report) = merge(&engagement, &stress, &Classifier::new());

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, "部署_Sales");
        assert_eq!(units[0].quadrant, Quadrant::Burnout);
        assert_eq!(units[0].risk_level, RiskLevel::Warning);
        assert_eq!(report.merged, 1);
        assert_eq!(report.unmatched_engagement, vec!["部署_OnlyEngagement"]);
        assert_eq!(report.unmatched_stress, vec!["部署_OnlyStress"]);
    }

    #[test]
    fn test_engagement_side_is_merge_authority() {
        let mut engagement = PartialMap::new();
        engagement.insert(eng("Dev", 42, Some(3.0)));
        let mut stress = PartialMap::new();
        stress.insert(st("Dev", 40, Some(2.0)));

        let (units, _) = merge(&engagement, &stress, &Classifier::new());
        assert_eq!(units[0].headcount, 42);
    }

    #[test]
    fn test_order_follows_engagement_map() {
        let mut engagement = PartialMap::new();
        for name in ["C", "A", "B"] {
            engagement.insert(eng(name, 20, Some(3.0)));
        }
        let mut stress = PartialMap::new();
        for name in ["A", "B", "C"] {
            stress.insert(st(name, 20, Some(2.0)));
        }

        let (units, _) = merge(&engagement, &stress, &Classifier::new());
        let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_null_score_unit_is_low_confidence() {
        let mut engagement = PartialMap::new();
        engagement.insert(eng("Ops", 30, None));
        let mut stress = PartialMap::new();
        stress.insert(st("Ops", 30, Some(3.5)));

        let (units, _) = merge(&engagement, &stress, &Classifier::new());
        assert_eq!(units[0].quadrant, Quadrant::Disengaged);
        assert!(units[0].is_low_confidence());
    }
}
