//! Format dispatch for uploads on disk or in memory.

use std::path::Path;

use polars::prelude::DataFrame;

use crate::csv::read_csv_bytes;
use crate::error::{IngestError, Result};
use crate::format::UploadFormat;
use crate::spreadsheet::read_spreadsheet_bytes;

/// Loads an upload from disk.
///
/// The extension is checked before the file is opened, so an unsupported
/// format fails without touching the file system.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    let format = UploadFormat::from_path(path)?;
    let bytes = read_bytes(path)?;
    load_table_from_bytes(bytes, format, &path.display().to_string())
}

/// Parses upload bytes in the given format.
pub fn load_table_from_bytes(
    bytes: Vec<u8>,
    format: UploadFormat,
    source_name: &str,
) -> Result<DataFrame> {
    let _span = tracing::debug_span!("load_table", source = source_name, %format).entered();
    match format {
        UploadFormat::Csv => read_csv_bytes(bytes, source_name),
        UploadFormat::Xlsx | UploadFormat::Xls => read_spreadsheet_bytes(bytes, source_name),
    }
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}
