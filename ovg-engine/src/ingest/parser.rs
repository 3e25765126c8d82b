//! Tabular Parser
//!
//! Purely syntactic: turns delimited text with a header row into one
//! header -> cell mapping per data row. No schema knowledge lives here.
//!
//! # Tolerance
//! - Blank lines and rows whose cells are all empty are skipped
//! - Short rows simply lack the trailing cells (absent, not an error)
//! - Cells beyond the header width are ignored
//! - Records the reader cannot decode are skipped with a warning

use std::collections::HashMap;
use tracing::{debug, warn};

/// Delimiters considered during auto-detection
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// One data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the source text
    pub line: usize,
    cells: HashMap<String, String>,
}

impl CsvRow {
    pub fn new(line: usize, cells: HashMap<String, String>) -> Self {
        Self { line, cells }
    }

    /// Raw cell for a (trimmed) header; `None` when the row has no such cell
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Delimited text parser
#[derive(Debug, Clone, Default)]
pub struct TabularParser {
    /// Fixed delimiter; auto-detected from the header line when `None`
    delimiter: Option<u8>,
}

impl TabularParser {
    /// Parser with delimiter auto-detection
    pub fn new() -> Self {
        Self { delimiter: None }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }

    /// Parse text into rows in source order
    pub fn parse(&self, text: &str) -> Vec<CsvRow> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let Some(header_line) = text.lines().find(|l| !l.trim().is_empty()) else {
            return Vec::new();
        };
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| detect_delimiter(header_line));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = match reader.headers() {
            Ok(record) => record.iter().map(|h| h.trim().to_string()).collect(),
            Err(e) => {
                warn!("Unable to read header row: {}", e);
                return Vec::new();
            }
        };

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable record: {}", e);
                    continue;
                }
            };

            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let mut cells = HashMap::with_capacity(headers.len());
            for (header, cell) in headers.iter().zip(record.iter()) {
                if header.is_empty() {
                    continue;
                }
                // First occurrence of a repeated header wins
                cells
                    .entry(header.clone())
                    .or_insert_with(|| cell.to_string());
            }

            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(rows.len() + 2);
            rows.push(CsvRow::new(line, cells));
        }

        let shown = (delimiter as char).escape_debug().to_string();
        debug!(rows = rows.len(), delimiter = %shown, "Parsed delimited text");
        rows
    }
}

/// Pick the most frequent candidate delimiter in the header line
///
/// Falls back to comma when none appears.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
