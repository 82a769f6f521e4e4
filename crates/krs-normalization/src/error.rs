//! Normalization error types.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while normalizing an upload.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// Required canonical columns are absent. No partial output is produced.
    #[error("required columns not found: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// A column expected in an already-normalized frame is absent.
    #[error("column '{0}' not found in DataFrame")]
    ColumnNotFound(String),

    #[error("DataFrame operation failed: {0}")]
    PolarsError(#[from] PolarsError),
}

impl NormalizationError {
    /// Names of the missing required columns, if this is a schema error.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::MissingColumns { missing } => Some(missing),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_display() {
        let err = NormalizationError::MissingColumns {
            missing: vec!["lat".to_string(), "tahun".to_string()],
        };
        assert_eq!(err.to_string(), "required columns not found: lat, tahun");
        assert_eq!(
            err.missing_columns(),
            Some(&["lat".to_string(), "tahun".to_string()][..])
        );
    }
}
