//! HTTP API handlers for ovg-api

pub mod analysis;
pub mod buildinfo;
pub mod dataset;
pub mod health;
pub mod units;

pub use analysis::analysis_routes;
pub use dataset::dataset_routes;
pub use health::health_routes;
pub use units::unit_routes;
