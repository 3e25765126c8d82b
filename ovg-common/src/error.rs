//! Common error types for the vitality grid

use thiserror::Error;

/// Common result type for vitality grid operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the vitality grid crates
///
/// Parse-level problems (bad numeric cells, missing columns, short rows) are
/// never reported through this type; they degrade to null values.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two rows of one survey export produced the same composite key
    /// (strict key mode only)
    #[error("Duplicate composite key '{key}' in {source_name} export (lines {first_line} and {second_line})")]
    DuplicateKey {
        key: String,
        source_name: String,
        first_line: usize,
        second_line: usize,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
