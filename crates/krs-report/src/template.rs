//! Sample upload showing the expected column layout.

use std::path::Path;

use krs_model::{COL_KECAMATAN, COL_LAT, COL_LON, COL_RISIKO, COL_TAHUN, RiskLabel};
use polars::prelude::*;

use crate::error::Result;
use crate::table::write_table;

/// Three example rows with the required columns and the optional `tahun`.
pub fn sample_upload() -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(COL_KECAMATAN.into(), ["Kecamatan X", "Kecamatan X", "Kecamatan Y"])
            .into_column(),
        Series::new(
            COL_RISIKO.into(),
            [
                RiskLabel::BERISIKO,
                RiskLabel::TIDAK_BERISIKO,
                RiskLabel::BERISIKO,
            ],
        )
        .into_column(),
        Series::new(COL_LAT.into(), [-6.5971, -6.5975, -6.6021]).into_column(),
        Series::new(COL_LON.into(), [106.8060, 106.8065, 106.8100]).into_column(),
        Series::new(COL_TAHUN.into(), [2024i64, 2024, 2024]).into_column(),
    ])?;
    Ok(df)
}

/// Writes the sample upload to `path` (`.xlsx` or `.csv`).
pub fn write_template(path: &Path) -> Result<()> {
    write_table(&sample_upload()?, path)
}
