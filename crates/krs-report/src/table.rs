//! Dataset output as XLSX or CSV.

use std::fs::File;
use std::path::Path;

use krs_model::any_to_string;
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{ReportError, Result};

/// Output table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Xlsx,
    Csv,
}

impl TableFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(ReportError::UnsupportedOutput { extension }),
        }
    }
}

/// Writes `df` to `path` in the format named by its extension.
pub fn write_table(df: &DataFrame, path: &Path) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    match format {
        TableFormat::Xlsx => write_xlsx(df, path)?,
        TableFormat::Csv => write_csv(df, path)?,
    }
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table written"
    );
    Ok(())
}

/// Writes `df` as a single-sheet workbook with a bold header row.
///
/// Numeric cells are written as numbers, booleans as booleans, nulls are left
/// blank and everything else is written as text.
pub fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, column) in df.get_columns().iter().enumerate() {
        let col = cell_column(col);
        sheet.write_string_with_format(0, col, column.name().as_str(), &header)?;
        for idx in 0..df.height() {
            let row = cell_row(idx + 1);
            match column.get(idx)? {
                AnyValue::Null => {}
                AnyValue::Boolean(value) => {
                    sheet.write_boolean(row, col, value)?;
                }
                value => match numeric(&value) {
                    Some(number) => {
                        sheet.write_number(row, col, number)?;
                    }
                    None => {
                        sheet.write_string(row, col, any_to_string(value))?;
                    }
                },
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Writes `df` as comma-separated text with a header row.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    let mut df = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

fn numeric(value: &AnyValue<'_>) -> Option<f64> {
    let number = match *value {
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

// Out-of-range indices saturate so the workbook writer reports its own
// row/column limit error.
fn cell_row(idx: usize) -> u32 {
    u32::try_from(idx).unwrap_or(u32::MAX)
}

fn cell_column(idx: usize) -> u16 {
    u16::try_from(idx).unwrap_or(u16::MAX)
}
