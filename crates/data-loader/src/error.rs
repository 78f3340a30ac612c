//! Error types for the data-loader crate.
//!
//! Every failure while reading the GoodReads files or assembling the
//! `DataIndex` is reported through `DataLoadError`.

use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected a record (bad quoting, invalid UTF-8, ...)
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Line in data file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same key appeared twice where keys must be unique
    #[error("Duplicate {entity} with id {id}")]
    DuplicateKey { entity: String, id: String },

    /// Referenced entity doesn't exist (e.g., rating for a book not in the catalog)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Instead of writing `Result<T, DataLoadError>` everywhere,
/// we can write `Result<T>`
pub type Result<T> = std::result::Result<T, DataLoadError>;
