//! Normalization of raw household uploads.
//!
//! Two normalizers share the canonical column names from `krs-model`:
//!
//! - **Schema normalizer** ([`normalize_schema`]): the strict batch path. Renames
//!   columns through a fixed alias table, requires all six canonical columns,
//!   projects to them, coerces coordinates and year, and drops incomplete rows.
//! - **Upload normalizer** ([`normalize_upload`]): the looser visualization path.
//!   Lower-cases column names, requires only area, label and coordinates, and
//!   canonicalizes risk labels (`1`/`True`/`Yes` to `Berisiko`, and so on).
//!
//! # Example
//!
//! ```ignore
//! use krs_normalization::{canonical_records, normalize_schema};
//!
//! let normalized = normalize_schema(&raw_df)?;
//! let records = canonical_records(&normalized)?;
//! ```
//!
//! Neither normalizer performs I/O; loading and writing files is the caller's concern.

mod columns;
mod error;
mod label;
mod schema;

pub use columns::{COLUMN_ALIASES, canonical_column_name, normalize_column_name};
pub use error::NormalizationError;
pub use label::{UPLOAD_REQUIRED_COLUMNS, canonicalize_risk_label, normalize_upload, title_case};
pub use schema::{canonical_records, normalize_schema};
