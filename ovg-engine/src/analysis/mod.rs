//! Analysis over merged units
//!
//! - `classifier`: quadrant and risk level
//! - `summary`: dashboard headline, grouping, statistics, filters
//! - `drivers`: gap-based driver ranking and insights
//! - `simulation`: what-if projections

pub mod classifier;
pub mod drivers;
pub mod simulation;
pub mod summary;

pub use classifier::Classifier;
pub use drivers::{DriverAnalyzer, Factor, ENGAGEMENT_CANDIDATES, STRESS_CANDIDATES};
pub use simulation::SimulationEngine;
pub use summary::{
    apply_filters, calculate_statistics, find_overall, generate_dashboard_summary,
    group_by_category, segment_comparison,
};
