//! XLSX / XLS reading with calamine.
//!
//! Only the first worksheet is read. Its first row is the header; every later
//! row is data. Columns whose non-empty cells are all numbers become `Float64`,
//! all booleans become `Boolean`, anything else becomes `String`.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use polars::prelude::*;

use krs_model::format_numeric;

use crate::error::{IngestError, Result};

/// Reads the first worksheet of an XLSX or XLS workbook into a DataFrame.
pub fn read_spreadsheet_bytes(bytes: Vec<u8>, source_name: &str) -> Result<DataFrame> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| IngestError::Spreadsheet {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            source_name: source_name.to_string(),
        })?
        .map_err(|e| IngestError::Spreadsheet {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(IngestError::EmptyFile {
            source_name: source_name.to_string(),
        });
    };
    let headers = unique_headers(header_row);
    let body: Vec<&[Data]> = rows
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .collect();

    let empty = Data::Empty;
    let mut columns = Vec::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(idx).unwrap_or(&empty))
            .collect();
        columns.push(build_column(name, &cells));
    }

    let df = DataFrame::new(columns)?;
    tracing::debug!(
        source = source_name,
        rows = df.height(),
        columns = df.width(),
        "parsed spreadsheet"
    );
    Ok(df)
}

/// Header names from the first row.
///
/// Blank headers become `unnamed_<index>` and repeated names get a `.<n>`
/// suffix, since a DataFrame cannot hold two columns with the same name.
fn unique_headers(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let raw = cell_text(cell).unwrap_or_default();
            let base = if raw.trim().is_empty() {
                format!("unnamed_{idx}")
            } else {
                raw
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

fn build_column(name: &str, cells: &[&Data]) -> Column {
    let non_empty = || cells.iter().filter(|cell| !is_blank(**cell));

    if non_empty().all(|cell| matches!(cell, Data::Int(_) | Data::Float(_))) {
        let values: Vec<Option<f64>> = cells.iter().map(|cell| cell_number(cell)).collect();
        return Series::new(name.into(), values).into_column();
    }
    if non_empty().all(|cell| matches!(cell, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), values).into_column();
    }
    let values: Vec<Option<String>> = cells.iter().map(|cell| cell_text(cell)).collect();
    Series::new(name.into(), values).into_column()
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(v) => Some(*v as f64),
        Data::Float(v) => Some(*v),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::Error(_) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_headers_dedupes_and_names_blanks() {
        let row = vec![
            Data::String("lat".to_string()),
            Data::Empty,
            Data::String("lat".to_string()),
        ];
        assert_eq!(unique_headers(&row), vec!["lat", "unnamed_1", "lat.1"]);
    }

    #[test]
    fn test_numeric_column_is_float() {
        let cells = [Data::Float(-6.5), Data::Empty, Data::Int(2)];
        let refs: Vec<&Data> = cells.iter().collect();
        let column = build_column("lat", &refs);
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn test_mixed_column_is_text() {
        let cells = [Data::Int(1), Data::String("Berisiko".to_string())];
        let refs: Vec<&Data> = cells.iter().collect();
        let column = build_column("risiko_stunting", &refs);
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.get(0).unwrap(), AnyValue::String("1"));
    }
}
