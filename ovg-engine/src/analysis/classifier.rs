//! Quadrant Classifier
//!
//! Places a unit on the engagement x stress grid and derives its risk level.
//!
//! # Quadrants
//! - Burnout: engagement ≥ threshold, stress ≥ threshold
//! - Thriving: engagement ≥ threshold, stress < threshold
//! - Distressed: engagement < threshold, stress ≥ threshold
//! - Disengaged: everything else, including any null score
//!
//! Both comparisons are inclusive. A null score yields `Disengaged` as an
//! uninformative fallback; such units report
//! [`OrganizationUnit::is_low_confidence`](ovg_common::model::OrganizationUnit::is_low_confidence).
//!
//! # Risk Levels
//! - Burnout with stress strictly above the critical threshold: Critical
//! - Burnout otherwise, Distressed: Warning
//! - Disengaged: Caution
//! - Thriving: Healthy

use ovg_common::model::{Quadrant, RiskLevel};
use ovg_common::AnalysisConfig;

/// Quadrant and risk classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    /// Engagement at or above this is high
    engagement_threshold: f64,
    /// Stress at or above this is high
    stress_threshold: f64,
    /// Burnout units above this stress are critical
    critical_stress_threshold: f64,
}

impl Classifier {
    /// Classifier with the default survey thresholds (3.2 / 2.65 / 2.9)
    pub fn new() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::with_thresholds(
            config.engagement_threshold,
            config.stress_threshold,
            config.critical_stress_threshold,
        )
    }

    pub fn with_thresholds(
        engagement_threshold: f64,
        stress_threshold: f64,
        critical_stress_threshold: f64,
    ) -> Self {
        Self {
            engagement_threshold,
            stress_threshold,
            critical_stress_threshold,
        }
    }

    pub fn quadrant(&self, engagement: Option<f64>, stress: Option<f64>) -> Quadrant {
        let (Some(engagement), Some(stress)) = (engagement, stress) else {
            return Quadrant::Disengaged;
        };

        let high_engagement = engagement >= self.engagement_threshold;
        let high_stress = stress >= self.stress_threshold;

        match (high_engagement, high_stress) {
            (true, true) => Quadrant::Burnout,
            (true, false) => Quadrant::Thriving,
            (false, true) => Quadrant::Distressed,
            (false, false) => Quadrant::Disengaged,
        }
    }

    pub fn risk_level(&self, quadrant: Quadrant, stress: Option<f64>) -> RiskLevel {
        match quadrant {
            Quadrant::Burnout => match stress {
                Some(s) if s > self.critical_stress_threshold => RiskLevel::Critical,
                _ => RiskLevel::Warning,
            },
            Quadrant::Distressed => RiskLevel::Warning,
            Quadrant::Disengaged => RiskLevel::Caution,
            Quadrant::Thriving => RiskLevel::Healthy,
        }
    }

    /// Quadrant and risk level in one call
    pub fn classify(&self, engagement: Option<f64>, stress: Option<f64>) -> (Quadrant, RiskLevel) {
        let quadrant = self.quadrant(engagement, stress);
        (quadrant, self.risk_level(quadrant, stress))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
