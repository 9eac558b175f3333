//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading and validating a dataset
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A dataset file is not valid JSON for its record type
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Referenced entity doesn't exist (e.g., an interaction by an unknown viewer)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
