//! What-if Simulation Engine
//!
//! Projects the change in engagement and stress from moving one factor to a
//! target value: delta x weight, per axis. The confidence attached to every
//! known-factor result is a fixed constant, not a fitted estimate.

use tracing::debug;

use ovg_common::model::{OrganizationUnit, SimulationResult};
use ovg_common::{AnalysisConfig, FactorTable};

use super::drivers::Factor;

#[derive(Debug, Clone)]
pub struct SimulationEngine {
    factors: FactorTable,
    confidence: f64,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            factors: config.factors.clone(),
            confidence: config.simulation_confidence,
        }
    }

    /// Simulate moving `factor` to `target` for one unit
    ///
    /// An unknown factor yields the zero-confidence sentinel. A null current
    /// value counts as 0.
    pub fn simulate(&self, unit: &OrganizationUnit, factor: &str, target: f64) -> SimulationResult {
        let Some(spec) = self.factors.get(factor) else {
            debug!(unit = %unit.id, factor, "Simulation requested for unknown factor");
            return SimulationResult::unknown_factor(factor, target);
        };

        let original = Factor::resolve(factor)
            .and_then(|f| f.value(unit))
            .unwrap_or(0.0);
        let delta = target - original;

        SimulationResult {
            factor: factor.to_string(),
            original_value: original,
            new_value: target,
            predicted_engagement_change: delta * spec.engagement_weight,
            predicted_stress_change: delta * spec.stress_weight,
            confidence: self.confidence,
        }
    }

    /// Factor names a simulation can be run for
    pub fn simulatable_factors(&self) -> Vec<String> {
        self.factors.names().map(str::to_string).collect()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
