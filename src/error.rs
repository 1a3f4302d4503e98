//! Error types for catalog_tools

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for catalog tool operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV file could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON file could not be parsed or serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A required input file was not found
    #[error("{0}")]
    MissingInput(String),
    /// A required column is absent from a CSV header
    #[error("no {column:?} column found in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },
}

/// Result alias for catalog tool operations
pub type Result<T> = std::result::Result<T, CatalogError>;
