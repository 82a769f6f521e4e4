//! Popup content, map output and table writers.

use polars::prelude::{DataType, IntoColumn, NamedFrom, Series};

use krs_aggregate::compute_area_stats;
use krs_ingest::load_table;
use krs_model::{AreaStats, RiskLabel, SurveyRecord};
use krs_report::{
    DEFAULT_ZOOM, MapOptions, ReportError, RiskMap, popup_text, sample_upload, write_table,
    write_template,
};

#[test]
fn popup_summarizes_an_area() {
    let stats = AreaStats::from_counts(2, 3, 5);
    insta::assert_snapshot!(popup_text("X", &stats), @r"
    Kecamatan: X
    Status: Rentan Stunting
    Persentase Berisiko: 40.0%
    Tidak Berisiko: 3 (60.0%)
    Berisiko: 2 (40.0%)
    Total Data: 5
    * Standar WHO: >20% Berisiko = Rentan Stunting
    * ≤20% Berisiko = Aman
    ");
}

#[test]
fn map_is_written_as_html_and_geojson() {
    let records = vec![
        SurveyRecord::new("Bogor Barat", RiskLabel::Berisiko).with_coordinates(-6.5971, 106.806),
        SurveyRecord::new("Bogor Timur", RiskLabel::TidakBerisiko)
            .with_coordinates(-6.6021, 106.81),
    ];
    let stats = compute_area_stats(&records);
    let map = RiskMap::build(&records, &stats, DEFAULT_ZOOM).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let html_path = dir.path().join("peta.html");
    map.write(&html_path, &MapOptions::default()).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Bogor Timur"));

    let geojson_path = dir.path().join("nested").join("peta.geojson");
    map.write(&geojson_path, &MapOptions::default()).unwrap();
    let geojson: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&geojson_path).unwrap()).unwrap();
    assert_eq!(geojson["features"].as_array().unwrap().len(), 2);
}

#[test]
fn custom_icons_are_used_when_present() {
    let records =
        vec![SurveyRecord::new("A", RiskLabel::Berisiko).with_coordinates(-6.5971, 106.806)];
    let stats = compute_area_stats(&records);
    let map = RiskMap::build(&records, &stats, DEFAULT_ZOOM).unwrap();

    let icons = tempfile::tempdir().unwrap();
    std::fs::write(icons.path().join("marker_green.png"), b"png").unwrap();
    std::fs::write(icons.path().join("marker_red.png"), b"png").unwrap();
    let options = MapOptions {
        icon_dir: Some(icons.path().to_path_buf()),
        ..MapOptions::default()
    };
    let html = map.to_html(&options).unwrap();
    assert!(html.contains("marker_red.png"));
    assert!(!html.contains("\"icon\":null"));
}

#[test]
fn xlsx_output_reads_back_with_the_same_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset_stunting_preprocessed.xlsx");
    let df = polars::prelude::DataFrame::new(vec![
        Series::new("lat".into(), [-6.5971]).into_column(),
        Series::new("lon".into(), [106.806]).into_column(),
        Series::new("namakelurahan".into(), [Some("Pasir Jaya")]).into_column(),
        Series::new("namakecamatan".into(), [None::<&str>]).into_column(),
        Series::new("tahun".into(), [2024i64]).into_column(),
        Series::new("risiko_stunting".into(), ["Berisiko"]).into_column(),
    ])
    .unwrap();
    write_table(&df, &path).unwrap();

    let back = load_table(&path).unwrap();
    assert_eq!(back.width(), 6);
    assert_eq!(back.height(), 1);
    assert_eq!(back.column("tahun").unwrap().dtype(), &DataType::Float64);
}

#[test]
fn template_is_written_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contoh.csv");
    write_template(&path).unwrap();

    let back = load_table(&path).unwrap();
    assert_eq!(back.height(), sample_upload().unwrap().height());
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("namakecamatan,risiko_stunting,lat,lon,tahun"));
}

#[test]
fn unsupported_output_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_template(&dir.path().join("contoh.txt")).unwrap_err();
    assert!(matches!(err, ReportError::UnsupportedOutput { .. }));
}
