//! Loading `krs.toml` settings.

use std::path::{Path, PathBuf};

use krs_cli::config::Config;

#[test]
fn default_settings() {
    insta::assert_json_snapshot!(Config::default(), @r#"
    {
      "artifacts": {
        "model_path": "model_lstm_2layer_risiko_stunting.json",
        "scaler_path": "preprocess_lstm_2layer_risiko_stunting.json"
      },
      "preprocess": {
        "input": "KRS - 3201 Bogor Th. 2024.xlsx",
        "output": "dataset_stunting_preprocessed.xlsx"
      },
      "map": {
        "output": "peta_rentan_stunting.html",
        "zoom": 12
      }
    }
    "#);
}

#[test]
fn explicit_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("krs.toml");
    std::fs::write(
        &path,
        r#"
[artifacts]
model_path = "artifacts/model.json"

[map]
icon_dir = "assets"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.artifacts.model_path, PathBuf::from("artifacts/model.json"));
    assert_eq!(config.map.icon_dir, Some(PathBuf::from("assets")));
    assert_eq!(config.map.zoom, 12);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = Config::load(Some(Path::new("/nonexistent/krs.toml"))).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/krs.toml"));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("krs.toml");
    std::fs::write(&path, "[map\nzoom = 12\n").unwrap();
    let err = Config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().starts_with("parse config"));
}
