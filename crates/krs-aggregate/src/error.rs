//! Aggregation error types.

use thiserror::Error;

/// Errors raised while filtering and aggregating records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// The filter combination matched no records. Nothing should be rendered.
    #[error("no records match {}", describe(.kecamatan, .tahun))]
    EmptyResult {
        kecamatan: Option<String>,
        tahun: Option<i64>,
    },
}

fn describe(kecamatan: &Option<String>, tahun: &Option<i64>) -> String {
    match (kecamatan, tahun) {
        (None, None) => "the selected data".to_string(),
        (Some(kecamatan), None) => format!("kecamatan '{kecamatan}'"),
        (None, Some(tahun)) => format!("tahun {tahun}"),
        (Some(kecamatan), Some(tahun)) => format!("kecamatan '{kecamatan}' in tahun {tahun}"),
    }
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_names_the_filter() {
        let err = AggregateError::EmptyResult {
            kecamatan: Some("Bogor Utara".to_string()),
            tahun: Some(2023),
        };
        assert_eq!(
            err.to_string(),
            "no records match kecamatan 'Bogor Utara' in tahun 2023"
        );
    }
}
