//! Unified error hierarchy for Aletheia
//!
//! Every fallible operation in the library returns [`AletheiaError`]. The pure
//! scoring functions are total and never produce one; errors only come from
//! input validation, file IO and configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportError;

/// Top-level error type for all Aletheia operations
#[derive(Debug, Error)]
pub enum AletheiaError {
    /// Metric bundle validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Run record errors
    #[error("Run error: {0}")]
    Run(#[from] RunError),

    /// Exercise catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Score range violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A score fell outside of 0..=100
    #[error("{field} must be between 0 and 100, got {value}")]
    ScoreOutOfRange { field: String, value: u8 },

    /// Perceived effort outside of 1..=10
    #[error("perceived effort must be between 1 and 10, got {value}")]
    EffortOutOfRange { value: u8 },
}

/// Errors in a run record or its snapshot sequence
#[derive(Debug, Error)]
pub enum RunError {
    /// Snapshot numbering is not 1, 2, 3, ...
    #[error("Snapshot {found} is out of sequence, expected {expected}")]
    SnapshotOutOfSequence { expected: u32, found: u32 },

    /// Distance or duration went backwards between snapshots
    #[error("Snapshot {number} goes backwards in {field}")]
    NonMonotonicSnapshot { number: u32, field: String },

    /// Run has no snapshots where at least one was required
    #[error("Run {run_id} has no snapshots")]
    NoSnapshots { run_id: String },

    /// Requested snapshot does not exist
    #[error("Snapshot {number} not found in run {run_id}")]
    SnapshotNotFound { run_id: String, number: u32 },

    /// Required metrics missing for the requested analysis
    #[error("Missing data for {analysis}: {reason}")]
    MissingData { analysis: String, reason: String },

    /// Negative or non-finite distance/duration
    #[error("Invalid {field}: {value}")]
    InvalidMeasurement { field: String, value: f64 },

    /// Run file could not be decoded
    #[error("Failed to parse run file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Exercise catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// TOML could not be decoded
    #[error("Failed to parse catalog: {reason}")]
    Parse { reason: String },

    /// Catalog file has no entries
    #[error("Catalog is empty")]
    Empty,

    /// Entry with no instruction steps
    #[error("Exercise '{name}' has no instructions")]
    MissingInstructions { name: String },
}

/// Result type alias for Aletheia operations
pub type Result<T> = std::result::Result<T, AletheiaError>;

impl AletheiaError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AletheiaError::Validation(_) => ErrorSeverity::Warning,
            AletheiaError::Run(RunError::SnapshotNotFound { .. }) => ErrorSeverity::Warning,
            AletheiaError::Run(RunError::MissingData { .. }) => ErrorSeverity::Warning,
            AletheiaError::Configuration(_) => ErrorSeverity::Error,
            AletheiaError::Io(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AletheiaError::Run(RunError::Parse { path, .. }) => {
                format!("Could not read run file: {}", path.display())
            }
            AletheiaError::Run(RunError::NoSnapshots { .. }) => {
                "This run has no per-snapshot data to report on.".to_string()
            }
            AletheiaError::Run(RunError::MissingData { .. }) => {
                "This run was recorded without per-snapshot data, so no coaching analysis is available."
                    .to_string()
            }
            AletheiaError::Validation(err) => {
                format!("Run data looks corrupted: {}", err)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}
