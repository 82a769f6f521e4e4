//! Report error types.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Errors raised while rendering maps or writing output files.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No record carries valid coordinates, so there is nothing to place.
    #[error("cannot render map: no record has valid coordinates")]
    NoCoordinates,

    #[error("unsupported output extension '{extension}' (expected xlsx or csv)")]
    UnsupportedOutput { extension: String },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("failed to serialize map data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
