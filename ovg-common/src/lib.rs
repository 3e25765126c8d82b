//! # Organization Vitality Grid Common Library
//!
//! Shared code for the vitality grid crates including:
//! - Domain model (organizational units, drivers, simulation results)
//! - Factor weight/benchmark/recommendation table
//! - Analysis tunables and configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod factors;
pub mod model;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use factors::{FactorDirection, FactorSpec, FactorTable};
