//! Row Normalizer
//!
//! Turns parsed rows of one survey export into partial unit records keyed by
//! composite key:
//! - segment label -> fixed category taxonomy (department is the catch-all)
//! - lenient numeric parsing (dash, blank, garbage -> null)
//! - privacy floor: rows with null or too-small headcount are dropped
//!
//! Duplicate keys within one export are last-write-wins; every collision is
//! logged and recorded in the report. Strict mode turns a collision into
//! [`Error::DuplicateKey`].

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use ovg_common::model::{
    EngagementDetails, EngagementDimension, SegmentCategory, StressDetails, StressDimension,
    SurveySource,
};
use ovg_common::{AnalysisConfig, Error, Result};

use super::parser::CsvRow;

/// Segment label column (both exports)
pub const CATEGORY_COLUMN: &str = "区分";
/// Segment name column (both exports)
pub const NAME_COLUMN: &str = "名称";
/// Respondent count column (both exports)
pub const HEADCOUNT_COLUMN: &str = "人数";
/// Engagement composite index (engagement export)
pub const ENGAGEMENT_SCORE_COLUMN: &str = "エンゲージメント総合指数";
/// Stress response total (stress export)
pub const STRESS_SCORE_COLUMN: &str = "心理的ストレス反応合計";

/// Category resolution order; first label contained in the cell wins
const CATEGORY_PRIORITY: [SegmentCategory; 6] = [
    SegmentCategory::Overall,
    SegmentCategory::JobTitle,
    SegmentCategory::EmploymentType,
    SegmentCategory::Site,
    SegmentCategory::Gender,
    SegmentCategory::AgeBracket,
];

/// Resolve a free-text segment label; anything unmatched is a department
pub fn resolve_category(label: &str) -> SegmentCategory {
    CATEGORY_PRIORITY
        .into_iter()
        .find(|c| label.contains(c.label()))
        .unwrap_or(SegmentCategory::Department)
}

/// Lenient numeric cell parsing
///
/// Reads the longest leading number, so unit suffixes such as `50人` or
/// `3.5pt` are ignored. Absent, empty, `-` and cells with no finite leading
/// number become `None`.
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    let value = cell?.trim();
    let numeric_len = value
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(value.len());
    let prefix = &value[..numeric_len];

    (1..=prefix.len())
        .rev()
        .find_map(|end| prefix[..end].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Stable composite key `{category label}_{name}`
///
/// Whitespace runs collapse to `_`; `/` and `\` become `_`.
pub fn composite_key(category: SegmentCategory, name: &str) -> String {
    let raw = format!("{}_{}", category.label(), name);
    let mut key = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                key.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        key.push(if ch == '/' || ch == '\\' { '_' } else { ch });
    }
    key
}

// ========================================
// Per-source detail extraction
// ========================================

/// Detail bag of one survey export
pub trait SurveyDetails: Default + Clone {
    const SOURCE: SurveySource;
    /// Column holding this export's classification axis
    const SCORE_COLUMN: &'static str;

    fn from_row(row: &CsvRow) -> Self;
}

impl SurveyDetails for EngagementDetails {
    const SOURCE: SurveySource = SurveySource::Engagement;
    const SCORE_COLUMN: &'static str = ENGAGEMENT_SCORE_COLUMN;

    fn from_row(row: &CsvRow) -> Self {
        let mut details = EngagementDetails::default();
        for dimension in EngagementDimension::ALL {
            details.set(dimension, parse_number(row.get(dimension.column())));
        }
        details
    }
}

impl SurveyDetails for StressDetails {
    const SOURCE: SurveySource = SurveySource::Stress;
    const SCORE_COLUMN: &'static str = STRESS_SCORE_COLUMN;

    fn from_row(row: &CsvRow) -> Self {
        let mut details = StressDetails::default();
        for dimension in StressDimension::ALL {
            details.set(dimension, parse_number(row.get(dimension.column())));
        }
        details
    }
}

// ========================================
// Partial records
// ========================================

/// One normalized row of one export
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUnit<D> {
    pub id: String,
    pub category: SegmentCategory,
    pub name: String,
    pub headcount: u32,
    /// Source line, for collision reporting
    pub line: usize,
    /// Classification axis of this export (engagement or stress score)
    pub score: Option<f64>,
    pub details: D,
}

/// Composite key -> partial record, iterating in first-insertion order
#[derive(Debug, Clone)]
pub struct PartialMap<D> {
    entries: Vec<PartialUnit<D>>,
    index: HashMap<String, usize>,
}

impl<D> Default for PartialMap<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<D> PartialMap<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite in place; returns the overwritten record's line
    pub fn insert(&mut self, unit: PartialUnit<D>) -> Option<usize> {
        match self.index.get(&unit.id) {
            Some(&slot) => {
                let previous = self.entries[slot].line;
                self.entries[slot] = unit;
                Some(previous)
            }
            None => {
                self.index.insert(unit.id.clone(), self.entries.len());
                self.entries.push(unit);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PartialUnit<D>> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartialUnit<D>> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|u| u.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A composite key produced by two rows of the same export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCollision {
    pub key: String,
    pub first_line: usize,
    pub second_line: usize,
}

/// What happened to one export's rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub source: SurveySource,
    pub rows_seen: usize,
    /// Null headcount or at/below the floor
    pub rows_below_floor: usize,
    /// Overwritten keys (last row wins)
    pub collisions: Vec<KeyCollision>,
}

/// Normalize parsed rows of one export
pub fn normalize_rows<D: SurveyDetails>(
    rows: &[CsvRow],
    config: &AnalysisConfig,
) -> Result<(PartialMap<D>, NormalizeReport)> {
    let mut map = PartialMap::new();
    let mut report = NormalizeReport {
        source: D::SOURCE,
        rows_seen: rows.len(),
        rows_below_floor: 0,
        collisions: Vec::new(),
    };

    for row in rows {
        let category = resolve_category(row.get(CATEGORY_COLUMN).unwrap_or(""));
        let name = row.get(NAME_COLUMN).unwrap_or("").to_string();

        // Floor applies to the stored (rounded) count
        let headcount = match parse_number(row.get(HEADCOUNT_COLUMN)).map(f64::round) {
            Some(n) if n > f64::from(config.headcount_floor) => n as u32,
            other => {
                debug!(
                    source = %D::SOURCE,
                    line = row.line,
                    name = %name,
                    headcount = ?other,
                    "Row dropped below headcount floor"
                );
                report.rows_below_floor += 1;
                continue;
            }
        };

        let id = composite_key(category, &name);
        let unit = PartialUnit {
            id: id.clone(),
            category,
            name,
            headcount,
            line: row.line,
            score: parse_number(row.get(D::SCORE_COLUMN)),
            details: D::from_row(row),
        };

        if config.strict_keys {
            if let Some(existing) = map.get(&id) {
                return Err(Error::DuplicateKey {
                    key: id,
                    source_name: D::SOURCE.to_string(),
                    first_line: existing.line,
                    second_line: row.line,
                });
            }
        }

        if let Some(first_line) = map.insert(unit) {
            warn!(
                source = %D::SOURCE,
                key = %id,
                first_line,
                second_line = row.line,
                "Duplicate composite key, later row overwrites earlier one"
            );
            report.collisions.push(KeyCollision {
                key: id,
                first_line,
                second_line: row.line,
            });
        }
    }

    debug!(
        source = %D::SOURCE,
        kept = map.len(),
        dropped = report.rows_below_floor,
        "Normalized survey rows"
    );
    Ok((map, report))
}
