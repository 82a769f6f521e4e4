//! CSV reading with Polars.

use std::io::Cursor;

use polars::prelude::*;

use crate::error::{IngestError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Rejects byte-order marks of encodings we cannot read (UTF-16).
///
/// A UTF-8 BOM is acceptable and stripped before parsing.
pub fn validate_encoding(bytes: &[u8], source_name: &str) -> Result<()> {
    if bytes.len() >= 2 {
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                source_name: source_name.to_string(),
                encoding: "UTF-16 LE",
            });
        }
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                source_name: source_name.to_string(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Reads CSV bytes into a DataFrame.
///
/// The first line is the header. Column types are inferred from every row, so
/// a column mixing numbers and text anywhere in the file is read as text;
/// numeric coercion of specific columns happens later in normalization.
pub fn read_csv_bytes(bytes: Vec<u8>, source_name: &str) -> Result<DataFrame> {
    validate_encoding(&bytes, source_name)?;

    let bytes = if bytes.starts_with(&UTF8_BOM) {
        bytes[UTF8_BOM.len()..].to_vec()
    } else {
        bytes
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyFile {
            source_name: source_name.to_string(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        source = source_name,
        rows = df.height(),
        columns = df.width(),
        "parsed CSV"
    );
    Ok(df)
}
