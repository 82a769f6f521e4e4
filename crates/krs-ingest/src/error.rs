//! Error types for upload ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an upload.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Format Errors ===
    /// File extension is not one of csv, xlsx, xls.
    #[error("unsupported file format '{extension}': use .csv, .xlsx or .xls")]
    UnsupportedFormat { extension: String },

    /// File starts with a byte-order mark of an encoding we do not read.
    #[error("unsupported encoding {encoding} in {source_name}")]
    UnsupportedEncoding {
        source_name: String,
        encoding: &'static str,
    },

    // === File System Errors ===
    /// Upload file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },

    /// Failed to open or read a workbook.
    #[error("failed to read spreadsheet {source_name}: {message}")]
    Spreadsheet {
        source_name: String,
        message: String,
    },

    /// Workbook has no worksheet to read.
    #[error("spreadsheet {source_name} has no worksheets")]
    NoWorksheet { source_name: String },

    /// Upload contains no header row.
    #[error("file is empty: {source_name}")]
    EmptyFile { source_name: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
