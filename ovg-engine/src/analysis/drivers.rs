//! Driver Analysis Engine
//!
//! Finds the sub-factors most likely behind a unit's condition by comparing
//! each candidate against its fixed benchmark.
//!
//! # Algorithm
//! 1. For each candidate factor with a non-null value: gap = current - benchmark
//! 2. Burden factors (higher is worse) are flagged when gap > epsilon;
//!    resource factors (lower is worse) when gap < -epsilon
//! 3. Impact score = |gap x primary weight| (stress weight unless zero)
//! 4. Stable sort by impact score descending, keep `max_drivers`
//! 5. Insights: one quadrant sentence, then the top driver and its action

use tracing::debug;

use ovg_common::model::{
    Driver, DriverAnalysis, DriverImpact, EngagementDimension, OrganizationUnit, Quadrant,
    StressDimension,
};
use ovg_common::{AnalysisConfig, FactorDirection, FactorTable};

/// Stress-check dimensions examined as drivers, in evaluation order
pub const STRESS_CANDIDATES: [StressDimension; 8] = [
    StressDimension::RoleConflict,
    StressDimension::QuantitativeWorkload,
    StressDimension::QualitativeWorkload,
    StressDimension::EmotionalBurden,
    StressDimension::SupervisorSupport,
    StressDimension::SupervisorLeadership,
    StressDimension::PraisingWorkplace,
    StressDimension::FailureTolerance,
];

/// Engagement dimensions examined as drivers, after the stress candidates
pub const ENGAGEMENT_CANDIDATES: [EngagementDimension; 4] = [
    EngagementDimension::ExpectationClarity,
    EngagementDimension::Feedback,
    EngagementDimension::GrowthOpportunity,
    EngagementDimension::PsychologicalSafety,
];

/// A factor name bound to the detail bag that holds its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    Stress(StressDimension),
    Engagement(EngagementDimension),
}

impl Factor {
    /// Resolve a factor name; stress dimensions take precedence
    pub fn resolve(name: &str) -> Option<Self> {
        StressDimension::from_label(name)
            .map(Factor::Stress)
            .or_else(|| EngagementDimension::from_label(name).map(Factor::Engagement))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Factor::Stress(d) => d.label(),
            Factor::Engagement(d) => d.label(),
        }
    }

    /// The unit's current value for this factor
    pub fn value(&self, unit: &OrganizationUnit) -> Option<f64> {
        match self {
            Factor::Stress(d) => unit.stress.get(*d),
            Factor::Engagement(d) => unit.engagement.get(*d),
        }
    }
}

/// Driver analyzer over an injectable factor table
#[derive(Debug, Clone)]
pub struct DriverAnalyzer {
    factors: FactorTable,
    /// Gap band inside which nothing is flagged
    epsilon: f64,
    max_drivers: usize,
}

impl DriverAnalyzer {
    pub fn new() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            factors: config.factors.clone(),
            epsilon: config.driver_epsilon,
            max_drivers: config.max_drivers,
        }
    }

    /// Fixed candidates first, then any extra table entries naming a dimension
    fn candidates(&self) -> Vec<Factor> {
        let mut candidates: Vec<Factor> = STRESS_CANDIDATES
            .into_iter()
            .map(Factor::Stress)
            .chain(ENGAGEMENT_CANDIDATES.into_iter().map(Factor::Engagement))
            .collect();

        for name in self.factors.names() {
            if let Some(factor) = Factor::resolve(name) {
                if !candidates.contains(&factor) {
                    candidates.push(factor);
                }
            }
        }
        candidates
    }

    /// Evaluate one factor for one unit
    ///
    /// `None` when the factor is unknown, has no value, or is within the
    /// epsilon band of its benchmark.
    fn evaluate(&self, unit: &OrganizationUnit, factor: Factor) -> Option<Driver> {
        let name = factor.name();
        let spec = self.factors.get(name)?;
        let current = factor.value(unit)?;

        let gap = current - spec.benchmark;
        let (flagged, impact) = match spec.direction {
            FactorDirection::HigherIsWorse => (gap > self.epsilon, DriverImpact::Negative),
            FactorDirection::LowerIsWorse => (gap < -self.epsilon, DriverImpact::Positive),
        };
        if !flagged {
            return None;
        }

        let correlation = spec.primary_weight();
        Some(Driver {
            factor: name.to_string(),
            correlation,
            impact,
            current_value: current,
            benchmark_value: spec.benchmark,
            gap,
            impact_score: (gap * correlation).abs(),
            recommendation: spec.recommendation().to_string(),
        })
    }

    /// Ranked drivers and insight sentences for one unit
    pub fn analyze(&self, unit: &OrganizationUnit) -> DriverAnalysis {
        let mut drivers: Vec<Driver> = self
            .candidates()
            .into_iter()
            .filter_map(|factor| self.evaluate(unit, factor))
            .collect();

        drivers.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
        drivers.truncate(self.max_drivers);

        debug!(unit = %unit.id, drivers = drivers.len(), "Driver analysis complete");

        DriverAnalysis {
            unit_id: unit.id.clone(),
            unit_name: unit.name.clone(),
            insights: generate_insights(unit, &drivers),
            top_drivers: drivers,
        }
    }

    /// Single-factor lookup; `None` for a name outside the factor table or
    /// outside the survey dimensions
    pub fn analyze_factor(&self, unit: &OrganizationUnit, factor: &str) -> Option<Driver> {
        if !self.factors.contains(factor) {
            return None;
        }
        self.evaluate(unit, Factor::resolve(factor)?)
    }
}

impl Default for DriverAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_insights(unit: &OrganizationUnit, drivers: &[Driver]) -> Vec<String> {
    let mut insights = Vec::new();

    match unit.quadrant {
        Quadrant::Burnout => insights.push(format!(
            "{}はエンゲージメントが高い一方でストレスも高く、バーンアウトのリスクがあります。",
            unit.name
        )),
        Quadrant::Distressed => insights.push(format!(
            "{}はエンゲージメントが低くストレスが高い状態です。早急な介入が必要です。",
            unit.name
        )),
        Quadrant::Disengaged => insights.push(format!(
            "{}は「静かな退職」状態の可能性があります。モチベーション向上施策を検討してください。",
            unit.name
        )),
        Quadrant::Thriving => {}
    }

    if let Some(primary) = drivers.first() {
        match primary.impact {
            DriverImpact::Negative => insights.push(format!(
                "主な課題は「{}」です（現在値: {:.2}、基準値: {:.2}）。",
                primary.factor, primary.current_value, primary.benchmark_value
            )),
            DriverImpact::Positive => insights.push(format!(
                "「{}」が基準値を下回っています（現在値: {:.2}、基準値: {:.2}）。",
                primary.factor, primary.current_value, primary.benchmark_value
            )),
        }
        insights.push(format!("推奨アクション: {}", primary.recommendation));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Classifier;
    use ovg_common::factors::FALLBACK_RECOMMENDATION;
    use ovg_common::model::{EngagementDetails, SegmentCategory, StressDetails};
    use ovg_common::FactorSpec;

    fn unit(engagement: f64, stress: f64) -> OrganizationUnit {
        let (quadrant, risk_level) = Classifier::new().classify(Some(engagement), Some(stress));
        OrganizationUnit {
            id: "部署_Sales".to_string(),
            category: SegmentCategory::Department,
            name: "Sales".to_string(),
            headcount: 50,
            engagement_score: Some(engagement),
            stress_score: Some(stress),
            engagement: EngagementDetails::default(),
            stress: StressDetails::default(),
            risk_level,
            quadrant,
        }
    }

    #[test]
    fn test_factor_resolution_prefers_stress() {
        assert_eq!(
            Factor::resolve("上司のサポート"),
            Some(Factor::Stress(StressDimension::SupervisorSupport))
        );
        assert_eq!(
            Factor::resolve("心理的安全性"),
            Some(Factor::Engagement(EngagementDimension::PsychologicalSafety))
        );
        assert_eq!(Factor::resolve("残業時間"), None);
    }

    #[test]
    fn test_burden_factor_flagged_above_epsilon() {
        let mut u = unit(3.5, 2.8);
        // benchmark 2.17, gap 0.83, weight 0.50
        u.stress.quantitative_workload = Some(3.0);
        // benchmark 2.82, gap 0.08: inside the band
        u.stress.role_conflict = Some(2.9);

        let analysis = DriverAnalyzer::new().analyze(&u);
        assert_eq!(analysis.top_drivers.len(), 1);

        let driver = &analysis.top_drivers[0];
        assert_eq!(driver.factor, "仕事の量的負担");
        assert_eq!(driver.impact, DriverImpact::Negative);
        assert_eq!(driver.correlation, 0.50);
        assert!((driver.gap - 0.83).abs() < 1e-9);
        assert!((driver.impact_score - 0.415).abs() < 1e-9);
    }

    #[test]
    fn test_resource_factor_flagged_below_epsilon() {
        let mut u = unit(3.0, 2.0);
        u.stress.supervisor_support = Some(2.0);
        // Above benchmark: never a driver for a resource factor
        u.engagement.feedback = Some(3.8);

        let analysis = DriverAnalyzer::new().analyze(&u);
        assert_eq!(analysis.top_drivers.len(), 1);
        assert_eq!(analysis.top_drivers[0].impact, DriverImpact::Positive);
        assert_eq!(analysis.top_drivers[0].correlation, -0.40);
    }

    #[test]
    fn test_ranking_descending_and_truncated() {
        let mut u = unit(2.5, 3.3);
        u.stress.quantitative_workload = Some(3.5); // 1.33 * 0.50 = 0.665
        u.stress.role_conflict = Some(3.5); // 0.68 * 0.45 = 0.306
        u.stress.emotional_burden = Some(3.5); // 0.83 * 0.40 = 0.332
        u.stress.supervisor_support = Some(1.5); // 1.08 * 0.40 = 0.432
        u.engagement.growth_opportunity = Some(2.0); // 1.40 * 0.10 = 0.14

        let analysis = DriverAnalyzer::new().analyze(&u);
        let names: Vec<&str> = analysis.top_drivers.iter().map(|d| d.factor.as_str()).collect();

        assert_eq!(names, vec!["仕事の量的負担", "上司のサポート", "情緒的負担"]);
        assert!(analysis
            .top_drivers
            .windows(2)
            .all(|w| w[0].impact_score >= w[1].impact_score));
    }

    #[test]
    fn test_insights_for_burnout_with_negative_driver() {
        let mut u = unit(3.5, 2.8);
        u.stress.quantitative_workload = Some(3.0);

        let insights = DriverAnalyzer::new().analyze(&u).insights;
        assert_eq!(insights.len(), 3);
        assert!(insights[0].starts_with("Salesはエンゲージメントが高い一方で"));
        assert_eq!(
            insights[1],
            "主な課題は「仕事の量的負担」です（現在値: 3.00、基準値: 2.17）。"
        );
        assert_eq!(insights[2], "推奨アクション: 業務棚卸し、タスクの優先順位付け支援");
    }

    #[test]
    fn test_insights_positive_driver_phrasing() {
        let mut u = unit(2.5, 3.3);
        u.stress.supervisor_support = Some(2.0);

        let insights = DriverAnalyzer::new().analyze(&u).insights;
        assert!(insights[0].contains("早急な介入が必要です"));
        assert_eq!(
            insights[1],
            "「上司のサポート」が基準値を下回っています（現在値: 2.00、基準値: 2.58）。"
        );
    }

    #[test]
    fn test_thriving_without_drivers_has_no_insights() {
        let analysis = DriverAnalyzer::new().analyze(&unit(3.8, 2.0));
        assert!(analysis.top_drivers.is_empty());
        assert!(analysis.insights.is_empty());
    }

    #[test]
    fn test_disengaged_without_drivers_has_quadrant_sentence_only() {
        let analysis = DriverAnalyzer::new().analyze(&unit(2.8, 2.0));
        assert_eq!(analysis.insights.len(), 1);
        assert!(analysis.insights[0].contains("静かな退職"));
    }

    #[test]
    fn test_missing_recommendation_falls_back() {
        let mut config = AnalysisConfig::default();
        if let Some(spec) = config.factors.get_mut("上司のサポート") {
            spec.recommendation = String::new();
        }
        let mut u = unit(3.0, 2.0);
        u.stress.supervisor_support = Some(2.0);

        let analysis = DriverAnalyzer::from_config(&config).analyze(&u);
        assert_eq!(analysis.top_drivers[0].recommendation, FALLBACK_RECOMMENDATION);
    }

    #[test]
    fn test_extra_table_factor_becomes_candidate() {
        let mut config = AnalysisConfig::default();
        config.factors.insert(
            "同僚のサポート",
            FactorSpec {
                engagement_weight: 0.2,
                stress_weight: -0.3,
                benchmark: 2.9,
                recommendation: "チーム内の相互支援を促す".to_string(),
                direction: FactorDirection::LowerIsWorse,
            },
        );
        let mut u = unit(3.0, 2.0);
        u.stress.coworker_support = Some(2.0);

        let analysis = DriverAnalyzer::from_config(&config).analyze(&u);
        assert_eq!(analysis.top_drivers[0].factor, "同僚のサポート");
    }

    #[test]
    fn test_analyze_factor_lookup() {
        let analyzer = DriverAnalyzer::new();
        let mut u = unit(3.0, 2.0);
        u.stress.supervisor_support = Some(2.0);
        u.engagement.feedback = Some(3.0);

        assert!(analyzer.analyze_factor(&u, "上司のサポート").is_some());
        // Known but at benchmark
        assert!(analyzer.analyze_factor(&u, "フィードバック").is_none());
        // Dimension without a table entry
        assert!(analyzer.analyze_factor(&u, "同僚のサポート").is_none());
        assert!(analyzer.analyze_factor(&u, "unknown").is_none());
    }
}
