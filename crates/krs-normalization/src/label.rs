//! Upload normalization for the map view and risk label canonicalization.

use std::collections::BTreeMap;

use polars::prelude::*;

use krs_model::{
    COL_KECAMATAN, COL_LAT, COL_LON, COL_RISIKO, COL_TAHUN, RiskLabel, SurveyRecord, any_to_f64,
    any_to_i64, any_to_string,
};

use crate::error::NormalizationError;

/// Columns an upload must carry to be shown on the map.
pub const UPLOAD_REQUIRED_COLUMNS: [&str; 4] = [COL_KECAMATAN, COL_RISIKO, COL_LAT, COL_LON];

const BERISIKO_ALIASES: [&str; 3] = ["1", "True", "Yes"];
const TIDAK_BERISIKO_ALIASES: [&str; 3] = ["0", "False", "No"];

/// Title-cases text: the first letter of every run of letters is upper-cased
/// and the rest of the run lower-cased. Non-letters are kept and end a run.
///
/// ```
/// use krs_normalization::title_case;
///
/// assert_eq!(title_case("tidak BERISIKO"), "Tidak Berisiko");
/// assert_eq!(title_case("rt05/rw2"), "Rt05/Rw2");
/// ```
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Canonicalizes a raw risk label.
///
/// The text is trimmed and title-cased, then `1`/`true`/`yes` become
/// `Berisiko` and `0`/`false`/`no` become `Tidak Berisiko` (case-insensitive).
/// Other values are kept title-cased.
pub fn canonicalize_risk_label(raw: &str) -> RiskLabel {
    let titled = title_case(raw.trim());
    if BERISIKO_ALIASES.contains(&titled.as_str()) {
        RiskLabel::Berisiko
    } else if TIDAK_BERISIKO_ALIASES.contains(&titled.as_str()) {
        RiskLabel::TidakBerisiko
    } else {
        RiskLabel::from_text(&titled)
    }
}

/// Normalizes an uploaded table for the map view.
///
/// Column names are only lower-cased. `namakecamatan`, `risiko_stunting`,
/// `lat` and `lon` are required; `tahun` is optional. Coordinates and year that
/// do not parse as numbers are left empty on the record rather than dropping
/// it, so the record still counts toward its area. Rows without an area name
/// are skipped.
pub fn normalize_upload(raw: &DataFrame) -> Result<Vec<SurveyRecord>, NormalizationError> {
    let mut columns: BTreeMap<String, &Column> = BTreeMap::new();
    for column in raw.get_columns() {
        let lowered = column.name().as_str().to_lowercase();
        columns.entry(lowered).or_insert(column);
    }

    let missing: Vec<String> = UPLOAD_REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "upload is missing required columns");
        return Err(NormalizationError::MissingColumns { missing });
    }

    let required = |name: &str| {
        columns
            .get(name)
            .copied()
            .ok_or_else(|| NormalizationError::ColumnNotFound(name.to_string()))
    };
    let kecamatan = required(COL_KECAMATAN)?;
    let risiko = required(COL_RISIKO)?;
    let lat = required(COL_LAT)?;
    let lon = required(COL_LON)?;
    let tahun = columns.get(COL_TAHUN).copied();

    let mut records = Vec::with_capacity(raw.height());
    let mut skipped = 0usize;
    for idx in 0..raw.height() {
        let area = kecamatan.get(idx)?;
        if area.is_null() {
            skipped += 1;
            continue;
        }
        let year = match tahun {
            Some(column) => any_to_i64(column.get(idx)?),
            None => None,
        };
        records.push(SurveyRecord {
            namakecamatan: any_to_string(area),
            risiko_stunting: canonicalize_risk_label(&any_to_string(risiko.get(idx)?)),
            lat: any_to_f64(lat.get(idx)?),
            lon: any_to_f64(lon.get(idx)?),
            tahun: year,
        });
    }

    tracing::info!(
        rows_in = raw.height(),
        records = records.len(),
        skipped,
        has_tahun = tahun.is_some(),
        "upload normalized"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_follows_letter_runs() {
        assert_eq!(title_case("berisiko"), "Berisiko");
        assert_eq!(title_case("TIDAK berisiko"), "Tidak Berisiko");
        assert_eq!(title_case("it's"), "It'S");
        assert_eq!(title_case("1"), "1");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_truthy_values_map_to_berisiko() {
        for raw in ["1", "true", "TRUE", " Yes ", "yes"] {
            assert_eq!(canonicalize_risk_label(raw), RiskLabel::Berisiko, "{raw}");
        }
    }

    #[test]
    fn test_falsy_values_map_to_tidak_berisiko() {
        for raw in ["0", "false", "No", " NO"] {
            assert_eq!(
                canonicalize_risk_label(raw),
                RiskLabel::TidakBerisiko,
                "{raw}"
            );
        }
    }

    #[test]
    fn test_canonical_text_is_recognized_after_title_case() {
        assert_eq!(canonicalize_risk_label("berisiko"), RiskLabel::Berisiko);
        assert_eq!(
            canonicalize_risk_label("tidak berisiko"),
            RiskLabel::TidakBerisiko
        );
    }

    #[test]
    fn test_unknown_values_pass_through_title_cased() {
        assert_eq!(
            canonicalize_risk_label("  sedang "),
            RiskLabel::Other("Sedang".to_string())
        );
        assert_eq!(canonicalize_risk_label(""), RiskLabel::Other(String::new()));
    }

    #[test]
    fn test_upload_requires_coordinates() {
        let df = DataFrame::new(vec![
            Series::new("NamaKecamatan".into(), ["A"]).into_column(),
            Series::new("Risiko_Stunting".into(), ["1"]).into_column(),
            Series::new("LON".into(), [106.8]).into_column(),
        ])
        .unwrap();
        let err = normalize_upload(&df).unwrap_err();
        assert_eq!(err.missing_columns().unwrap(), &["lat".to_string()]);
    }

    #[test]
    fn test_upload_without_tahun_is_accepted() {
        let df = DataFrame::new(vec![
            Series::new("namakecamatan".into(), ["A", "B"]).into_column(),
            Series::new("risiko_stunting".into(), [1.0, 0.0]).into_column(),
            Series::new("lat".into(), [-6.5, -6.6]).into_column(),
            Series::new("lon".into(), [106.8, 106.9]).into_column(),
        ])
        .unwrap();
        let records = normalize_upload(&df).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].risiko_stunting, RiskLabel::Berisiko);
        assert_eq!(records[1].risiko_stunting, RiskLabel::TidakBerisiko);
        assert!(records.iter().all(|record| record.tahun.is_none()));
    }

    #[test]
    fn test_upload_keeps_records_with_bad_coordinates() {
        let df = DataFrame::new(vec![
            Series::new("namakecamatan".into(), [Some("A"), None]).into_column(),
            Series::new("risiko_stunting".into(), ["Berisiko", "Berisiko"]).into_column(),
            Series::new("lat".into(), ["n/a", "-6.6"]).into_column(),
            Series::new("lon".into(), ["106.8", "106.9"]).into_column(),
            Series::new("tahun".into(), [2024i64, 2023]).into_column(),
        ])
        .unwrap();
        let records = normalize_upload(&df).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lat, None);
        assert_eq!(records[0].lon, Some(106.8));
        assert_eq!(records[0].tahun, Some(2024));
    }
}
