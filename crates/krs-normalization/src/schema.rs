//! Strict schema normalization for the batch preprocessing path.

use std::collections::BTreeMap;

use polars::prelude::*;

use krs_model::{
    CANONICAL_COLUMNS, COL_KECAMATAN, COL_KELURAHAN, COL_LAT, COL_LON, COL_RISIKO, COL_TAHUN,
    CanonicalRecord, any_to_f64, any_to_i64, any_to_string,
};

use crate::columns::canonical_column_name;
use crate::error::NormalizationError;
use crate::label::canonicalize_risk_label;

/// Normalizes a raw table to the six canonical columns.
///
/// 1. Column names are lower-cased, trimmed, spaces become underscores, then
///    aliases resolve to canonical names. When two source columns resolve to
///    the same name the first one wins.
/// 2. All of `lat, lon, namakelurahan, namakecamatan, tahun, risiko_stunting`
///    must be present, otherwise [`NormalizationError::MissingColumns`] lists
///    the absent ones in canonical order.
/// 3. The output holds exactly those columns, in that order.
/// 4. `lat`/`lon` become `Float64` and `tahun` becomes `Int64`; unparseable or
///    non-finite values are null, as is a year with a fractional part.
/// 5. Rows with a null `lat`, `lon` or `tahun` are dropped. Text columns keep
///    their source values, nulls included.
pub fn normalize_schema(raw: &DataFrame) -> Result<DataFrame, NormalizationError> {
    let resolved = resolve_columns(raw);

    let missing: Vec<String> = CANONICAL_COLUMNS
        .iter()
        .filter(|name| !resolved.contains_key(**name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "upload is missing required columns");
        return Err(NormalizationError::MissingColumns { missing });
    }

    let column = |name: &str| {
        resolved
            .get(name)
            .copied()
            .ok_or_else(|| NormalizationError::ColumnNotFound(name.to_string()))
    };

    let height = raw.height();
    let lat = coerce_f64(column(COL_LAT)?, height)?;
    let lon = coerce_f64(column(COL_LON)?, height)?;
    let tahun = coerce_i64(column(COL_TAHUN)?, height)?;

    let keep: Vec<bool> = (0..height)
        .map(|idx| lat[idx].is_some() && lon[idx].is_some() && tahun[idx].is_some())
        .collect();
    let dropped = keep.iter().filter(|kept| !**kept).count();

    let projected = DataFrame::new(vec![
        Series::new(COL_LAT.into(), lat).into_column(),
        Series::new(COL_LON.into(), lon).into_column(),
        column(COL_KELURAHAN)?.clone().with_name(COL_KELURAHAN.into()),
        column(COL_KECAMATAN)?.clone().with_name(COL_KECAMATAN.into()),
        Series::new(COL_TAHUN.into(), tahun).into_column(),
        column(COL_RISIKO)?.clone().with_name(COL_RISIKO.into()),
    ])?;

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let normalized = projected.filter(&mask)?;

    tracing::info!(
        rows_in = height,
        rows_out = normalized.height(),
        dropped,
        "schema normalized"
    );
    Ok(normalized)
}

/// Converts a normalized frame into typed records.
///
/// Expects the output of [`normalize_schema`]. Rows with a missing coordinate
/// or year (only possible for frames that were not normalized) are skipped.
/// Null text cells become empty strings; risk labels go through
/// [`canonicalize_risk_label`].
pub fn canonical_records(df: &DataFrame) -> Result<Vec<CanonicalRecord>, NormalizationError> {
    let column = |name: &str| {
        df.column(name)
            .map_err(|_| NormalizationError::ColumnNotFound(name.to_string()))
    };
    let lat = column(COL_LAT)?;
    let lon = column(COL_LON)?;
    let kelurahan = column(COL_KELURAHAN)?;
    let kecamatan = column(COL_KECAMATAN)?;
    let tahun = column(COL_TAHUN)?;
    let risiko = column(COL_RISIKO)?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let (Some(lat), Some(lon), Some(tahun)) = (
            any_to_f64(lat.get(idx)?),
            any_to_f64(lon.get(idx)?),
            any_to_i64(tahun.get(idx)?),
        ) else {
            tracing::debug!(row = idx, "skipping row without coordinates or year");
            continue;
        };
        records.push(CanonicalRecord {
            lat,
            lon,
            namakelurahan: any_to_string(kelurahan.get(idx)?),
            namakecamatan: any_to_string(kecamatan.get(idx)?),
            tahun,
            risiko_stunting: canonicalize_risk_label(&any_to_string(risiko.get(idx)?)),
        });
    }
    Ok(records)
}

/// Maps canonical names to the first source column that resolves to them.
fn resolve_columns(raw: &DataFrame) -> BTreeMap<String, &Column> {
    let mut resolved: BTreeMap<String, &Column> = BTreeMap::new();
    for column in raw.get_columns() {
        let source = column.name().as_str();
        let canonical = canonical_column_name(source);
        if let Some(existing) = resolved.get(&canonical) {
            tracing::warn!(
                source,
                canonical = %canonical,
                kept = existing.name().as_str(),
                "duplicate column after renaming, keeping the first"
            );
            continue;
        }
        resolved.insert(canonical, column);
    }
    resolved
}

fn coerce_f64(column: &Column, height: usize) -> Result<Vec<Option<f64>>, NormalizationError> {
    let mut values = Vec::with_capacity(height);
    for idx in 0..height {
        values.push(any_to_f64(column.get(idx)?));
    }
    Ok(values)
}

fn coerce_i64(column: &Column, height: usize) -> Result<Vec<Option<i64>>, NormalizationError> {
    let mut values = Vec::with_capacity(height);
    for idx in 0..height {
        values.push(any_to_i64(column.get(idx)?));
    }
    Ok(values)
}
