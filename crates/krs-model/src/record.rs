//! Household records in canonical and survey form.

use serde::{Deserialize, Serialize};

use crate::risk::RiskLabel;

pub const COL_LAT: &str = "lat";
pub const COL_LON: &str = "lon";
pub const COL_KELURAHAN: &str = "namakelurahan";
pub const COL_KECAMATAN: &str = "namakecamatan";
pub const COL_TAHUN: &str = "tahun";
pub const COL_RISIKO: &str = "risiko_stunting";

/// The canonical schema, in output column order.
pub const CANONICAL_COLUMNS: [&str; 6] = [
    COL_LAT,
    COL_LON,
    COL_KELURAHAN,
    COL_KECAMATAN,
    COL_TAHUN,
    COL_RISIKO,
];

/// A fully normalized household record.
///
/// Coordinates and year are always finite; text fields may be empty when the
/// source cell was blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub lat: f64,
    pub lon: f64,
    pub namakelurahan: String,
    pub namakecamatan: String,
    pub tahun: i64,
    pub risiko_stunting: RiskLabel,
}

/// A record from an uploaded dataset on the visualization path.
///
/// Only the area name and the risk label are guaranteed; coordinates and year
/// are optional and simply excluded where they are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub namakecamatan: String,
    pub risiko_stunting: RiskLabel,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tahun: Option<i64>,
}

impl SurveyRecord {
    pub fn new(namakecamatan: impl Into<String>, risiko_stunting: RiskLabel) -> Self {
        Self {
            namakecamatan: namakecamatan.into(),
            risiko_stunting,
            lat: None,
            lon: None,
            tahun: None,
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    #[must_use]
    pub fn with_tahun(mut self, tahun: i64) -> Self {
        self.tahun = Some(tahun);
        self
    }
}

impl From<CanonicalRecord> for SurveyRecord {
    fn from(record: CanonicalRecord) -> Self {
        Self {
            namakecamatan: record.namakecamatan,
            risiko_stunting: record.risiko_stunting,
            lat: Some(record.lat),
            lon: Some(record.lon),
            tahun: Some(record.tahun),
        }
    }
}

/// Read access shared by every record shape the aggregator accepts.
pub trait AreaRecord {
    /// Administrative area (kecamatan) the record belongs to.
    fn area(&self) -> &str;

    fn risk(&self) -> &RiskLabel;

    /// Both coordinates, or `None` when either is missing or non-finite.
    fn coordinates(&self) -> Option<(f64, f64)>;

    fn year(&self) -> Option<i64>;
}

impl AreaRecord for CanonicalRecord {
    fn area(&self) -> &str {
        &self.namakecamatan
    }

    fn risk(&self) -> &RiskLabel {
        &self.risiko_stunting
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        (self.lat.is_finite() && self.lon.is_finite()).then_some((self.lat, self.lon))
    }

    fn year(&self) -> Option<i64> {
        Some(self.tahun)
    }
}

impl AreaRecord for SurveyRecord {
    fn area(&self) -> &str {
        &self.namakecamatan
    }

    fn risk(&self) -> &RiskLabel {
        &self.risiko_stunting
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    fn year(&self) -> Option<i64> {
        self.tahun
    }
}
