use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Error type covering the different failure cases that can occur while the
/// tool loads a board export, derives the sheet, or talks to the sheet
/// service.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the board export is not syntactically valid JSON.
    #[error("malformed board export: {0}")]
    MalformedExport(serde_json::Error),

    /// Raised when the export parses as JSON but violates the expected
    /// structure, e.g. the top-level `name` field is absent.
    #[error("export schema violation: {0}")]
    SchemaViolation(String),

    /// Raised when JSON serialization fails outside of export parsing.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the email-mapping workbook reader.
    #[error("mapping read error: {0}")]
    MappingRead(#[from] calamine::XlsxError),

    /// Raised when the mapping workbook does not follow the expected
    /// two-column layout.
    #[error("invalid mapping workbook: {0}")]
    InvalidMapping(String),

    /// Raised when a sheet-service call that the migration cannot proceed
    /// without has failed.
    #[error("remote sheet operation failed: {0}")]
    Remote(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
