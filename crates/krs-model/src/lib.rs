//! Domain types for the stunting risk toolkit.
//!
//! This crate provides the shared contract between the independent pipeline units:
//! - [`record`]: canonical and survey records, and the [`AreaRecord`] view used by aggregation
//! - [`risk`]: risk labels, area status and the fixed decision thresholds
//! - [`profile`]: the household questionnaire ([`FamilyProfile`]) and its categorical answers
//! - [`stats`]: per-area aggregation results
//! - [`polars`]: Polars `AnyValue` utility functions

pub mod polars;
pub mod profile;
pub mod record;
pub mod risk;
pub mod stats;

pub use profile::{Answer, FamilyProfile, ParseCategoryError, WaterSource, WelfareRank};
pub use record::{
    AreaRecord, CANONICAL_COLUMNS, COL_KECAMATAN, COL_KELURAHAN, COL_LAT, COL_LON, COL_RISIKO,
    COL_TAHUN, CanonicalRecord, SurveyRecord,
};
pub use risk::{AreaStatus, RISK_SCORE_THRESHOLD, RiskLabel, WHO_THRESHOLD_PERCENT};
pub use stats::AreaStats;

pub use polars::{any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64};
