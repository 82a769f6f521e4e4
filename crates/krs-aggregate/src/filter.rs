//! Area and year filters for the dashboard.

use std::collections::BTreeSet;

use krs_model::AreaRecord;
use serde::Serialize;

use crate::error::{AggregateError, Result};

/// Label of the "no restriction" choice.
pub const ALL_OPTION: &str = "Semua";

/// Selected kecamatan and year. `None` selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub kecamatan: Option<String>,
    pub tahun: Option<i64>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_kecamatan(mut self, kecamatan: impl Into<String>) -> Self {
        self.kecamatan = Some(kecamatan.into());
        self
    }

    #[must_use]
    pub fn with_tahun(mut self, tahun: i64) -> Self {
        self.tahun = Some(tahun);
        self
    }

    /// True when no restriction is selected.
    pub fn is_unrestricted(&self) -> bool {
        self.kecamatan.is_none() && self.tahun.is_none()
    }

    /// Keeps the records matching the selection.
    ///
    /// The kecamatan must match exactly. The year restriction only applies
    /// when the data carries years at all; without any year it is ignored.
    /// An empty selection is [`AggregateError::EmptyResult`].
    pub fn apply<R: AreaRecord + Clone>(&self, records: &[R]) -> Result<Vec<R>> {
        let has_years = records.iter().any(|record| record.year().is_some());
        let tahun = match self.tahun {
            Some(tahun) if !has_years => {
                tracing::warn!(tahun, "data has no tahun values, ignoring year filter");
                None
            }
            other => other,
        };

        let selected: Vec<R> = records
            .iter()
            .filter(|record| {
                self.kecamatan
                    .as_deref()
                    .is_none_or(|kecamatan| record.area() == kecamatan)
            })
            .filter(|record| tahun.is_none_or(|tahun| record.year() == Some(tahun)))
            .cloned()
            .collect();

        tracing::debug!(
            kecamatan = self.kecamatan.as_deref().unwrap_or(ALL_OPTION),
            tahun = ?tahun,
            records_in = records.len(),
            records_out = selected.len(),
            "filter applied"
        );

        if selected.is_empty() {
            return Err(AggregateError::EmptyResult {
                kecamatan: self.kecamatan.clone(),
                tahun,
            });
        }
        Ok(selected)
    }
}

/// Distinct choices available for filtering a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Area names, sorted ascending.
    pub kecamatan: Vec<String>,
    /// Years, newest first. Empty when the data carries no years.
    pub tahun: Vec<i64>,
}

impl FilterOptions {
    pub fn has_years(&self) -> bool {
        !self.tahun.is_empty()
    }
}

/// Collects the distinct areas and years of `records`.
pub fn filter_options<R: AreaRecord>(records: &[R]) -> FilterOptions {
    let kecamatan: BTreeSet<&str> = records.iter().map(AreaRecord::area).collect();
    let tahun: BTreeSet<i64> = records.iter().filter_map(AreaRecord::year).collect();
    FilterOptions {
        kecamatan: kecamatan.into_iter().map(str::to_string).collect(),
        tahun: tahun.into_iter().rev().collect(),
    }
}
