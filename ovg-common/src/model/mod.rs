//! Domain model shared by the engine and the HTTP boundary

pub mod analysis;
pub mod unit;

pub use analysis::{
    Driver, DriverAnalysis, DriverImpact, DashboardSummary, FilterConfig, ScoreStatistics,
    SegmentComparison, SimulationResult, TrendDirection,
};
pub use unit::{
    EngagementDetails, EngagementDimension, OrganizationUnit, Quadrant, RiskLevel,
    SegmentCategory, StressDetails, StressDimension, SurveySource,
};
