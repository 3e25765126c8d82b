//! # Organization Vitality Grid Engine
//!
//! Ingests the engagement survey and stress-check exports, joins them per
//! organizational unit and runs the analyses on top:
//!
//! - [`ingest`]: tabular parsing, row normalization, inner-join merge
//! - [`analysis`]: quadrant classification, dashboard summary, driver
//!   ranking, what-if simulation
//! - [`pipeline`]: one-call text/file loading into an immutable [`Dataset`]

pub mod analysis;
pub mod ingest;
pub mod pipeline;

pub use analysis::{Classifier, DriverAnalyzer, SimulationEngine};
pub use pipeline::{load_from_files, load_from_text, Dataset, LoadReport};
