//! Error types for the explorer generation pipeline.
//!
//! This module defines a hierarchy of error types, one per pipeline stage:
//!
//! - [`FetchError`] - remote reference sheets could not be retrieved or parsed
//! - [`TemplateError`] - a template referenced a missing reference column
//! - [`PostProcessError`] - filtering, casting or default-view selection failed
//! - [`SerializeError`] - the assembled explorer is structurally invalid
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. All errors are fatal:
//! generation is a one-shot batch run with no partial-output mode.

use thiserror::Error;

// =============================================================================
// Reference Sheet Errors
// =============================================================================

/// Errors while fetching or parsing a reference sheet.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned an error status.
    #[error("Failed to fetch sheet: {0}")]
    Http(#[from] reqwest::Error),

    /// The fetched payload is not valid CSV.
    #[error("Invalid CSV in sheet '{sheet}': {source}")]
    Csv {
        sheet: String,
        #[source]
        source: csv::Error,
    },

    /// The sheet parsed but contains no data rows.
    #[error("Sheet '{0}' has no rows")]
    EmptySheet(String),

    /// The sheet has no header row at all.
    #[error("Sheet '{0}' has no header row")]
    NoHeader(String),

    /// Failed to read a local CSV file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Template Errors
// =============================================================================

/// A template referenced a reference-table field that does not exist.
///
/// Raised eagerly during row expansion so a typo in a column name fails the
/// run with a precise location instead of silently emitting an empty field.
#[derive(Debug, Error)]
#[error("Sheet '{sheet}', row {row}: no column '{column}'")]
pub struct TemplateError {
    /// Name of the reference sheet being read.
    pub sheet: String,
    /// Zero-based data row index within the sheet.
    pub row: usize,
    /// The missing column name.
    pub column: String,
}

// =============================================================================
// Post-Processing Errors
// =============================================================================

/// Errors during post-processing of an expanded output table.
#[derive(Debug, Error)]
pub enum PostProcessError {
    /// Integer cast hit a value with a fractional part.
    #[error("Column '{column}', row {row}: cannot cast '{value}' to integer")]
    NonIntegral {
        column: String,
        row: usize,
        value: String,
    },

    /// The default-view predicate matched zero rows.
    #[error("Default view selection matched no rows")]
    NoDefaultView,

    /// The default-view predicate matched more than one row.
    #[error("Default view selection matched {0} rows, expected exactly 1")]
    AmbiguousDefaultView(usize),

    /// An operation referenced an output column that was never introduced.
    #[error("Output table has no column '{0}'")]
    UnknownColumn(String),
}

// =============================================================================
// Serialization Errors
// =============================================================================

/// Errors while rendering or writing the final explorer file.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// A `table`/`columns` block has no rows.
    #[error("Table block '{0}' has no column definitions")]
    EmptyTableBlock(String),

    /// The graphers block has no rows.
    #[error("Graphers block has no rows")]
    EmptyGraphers,

    /// More than one graphers row has the default-view flag set.
    #[error("Graphers block has {0} default views, expected at most 1")]
    MultipleDefaultViews(usize),

    /// Failed to write the output file.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tempfile::PersistError> for SerializeError {
    fn from(e: tempfile::PersistError) -> Self {
        SerializeError::Io(e.error)
    }
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Top-level error for a full fetch → expand → serialize run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Post-processing error: {0}")]
    PostProcess(#[from] PostProcessError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// The requested explorer slug is not registered.
    #[error("Unknown explorer: '{0}'")]
    UnknownExplorer(String),
}
