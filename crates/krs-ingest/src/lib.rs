//! Upload ingestion utilities.
//!
//! This crate loads household datasets (CSV, XLSX, XLS) into Polars DataFrames.
//! No column renaming or validation happens here; that is the normalizers' job.
//!
//! # Features
//!
//! - **Format detection**: accept `csv`, `xlsx` and `xls` by extension, reject anything else
//! - **CSV loading**: Polars CSV reader with schema inference
//! - **Spreadsheet loading**: first worksheet, first row as header, typed columns
//! - **Upload cache**: parsed tables memoized by the SHA-256 of their bytes
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use krs_ingest::{UploadCache, load_table};
//!
//! let df = load_table(Path::new("KRS - 3201 Bogor Th. 2024.xlsx"))?;
//!
//! let mut cache = UploadCache::new();
//! let table = cache.load_path(Path::new("upload.csv"))?;
//! ```

mod cache;
mod csv;
mod error;
mod format;
mod loader;
mod spreadsheet;

// === Error Types ===
pub use error::{IngestError, Result};

// === Formats ===
pub use format::UploadFormat;

// === Loading ===
pub use csv::{read_csv_bytes, validate_encoding};
pub use loader::{load_table, load_table_from_bytes};
pub use spreadsheet::read_spreadsheet_bytes;

// === Cache ===
pub use cache::{CacheKey, UploadCache};
