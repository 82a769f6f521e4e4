//! Spreadsheet loading against workbooks written on the fly.

use krs_ingest::{IngestError, UploadCache, load_table};
use polars::prelude::{AnyValue, DataType};
use rust_xlsxwriter::Workbook;

fn write_workbook(path: &std::path::Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["Nama Kecamatan", "Latitude", "Longitude", "Tahun", "Resiko Stunting"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let rows = [
        ("Bogor Barat", -6.5971, 106.806, 2024.0, "Berisiko"),
        ("Bogor Timur", -6.6021, 106.81, 2024.0, "Tidak Berisiko"),
    ];
    for (idx, (kecamatan, lat, lon, tahun, risiko)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *kecamatan).unwrap();
        sheet.write_number(row, 1, *lat).unwrap();
        sheet.write_number(row, 2, *lon).unwrap();
        sheet.write_number(row, 3, *tahun).unwrap();
        sheet.write_string(row, 4, *risiko).unwrap();
    }
    workbook.save(path).unwrap();
}

#[test]
fn reads_first_sheet_with_typed_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("KRS - 3201 Bogor Th. 2024.xlsx");
    write_workbook(&path);

    let df = load_table(&path).expect("read workbook");
    assert_eq!(df.height(), 2);
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["Nama Kecamatan", "Latitude", "Longitude", "Tahun", "Resiko Stunting"]
    );
    assert_eq!(df.column("Latitude").unwrap().dtype(), &DataType::Float64);
    assert_eq!(
        df.column("Nama Kecamatan").unwrap().get(1).unwrap(),
        AnyValue::String("Bogor Timur")
    );
}

#[test]
fn cache_reuses_parsed_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.xlsx");
    write_workbook(&path);

    let mut cache = UploadCache::new();
    cache.load_path(&path).unwrap();
    cache.load_path(&path).unwrap();
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn corrupt_workbook_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a workbook").unwrap();

    let result = load_table(&path);
    assert!(matches!(result, Err(IngestError::Spreadsheet { .. })));
}
