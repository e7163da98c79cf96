//! Error types for the loaders
//!
//! The engines themselves are total and never fail; only reading account
//! files and assumption tables can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid number for '{key}': {value}")]
    InvalidNumber { key: String, value: String },
}

pub type LoadResult<T> = Result<T, LoadError>;
