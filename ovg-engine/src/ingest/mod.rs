//! Survey ingestion
//!
//! Delimited text -> row mappings -> per-source partial records -> merged
//! organizational units.

pub mod merge;
pub mod normalizer;
pub mod parser;

pub use merge::{merge, MergeReport};
pub use normalizer::{
    composite_key, normalize_rows, parse_number, resolve_category, KeyCollision,
    NormalizeReport, PartialMap, PartialUnit, SurveyDetails,
};
pub use parser::{CsvRow, TabularParser};
