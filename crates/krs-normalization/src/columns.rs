//! Column name normalization and the alias table.

use krs_model::{COL_KECAMATAN, COL_KELURAHAN, COL_LAT, COL_LON, COL_RISIKO, COL_TAHUN};

/// Alternative column names accepted for each canonical column.
///
/// Keys are already normalized (lower-case, trimmed, spaces as underscores).
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    // coordinates
    ("latitude", COL_LAT),
    ("lat", COL_LAT),
    ("longitude", COL_LON),
    ("lng", COL_LON),
    ("long", COL_LON),
    // administrative areas
    ("nama_kelurahan", COL_KELURAHAN),
    ("kelurahan", COL_KELURAHAN),
    ("nama_desa", COL_KELURAHAN),
    ("nama_kecamatan", COL_KECAMATAN),
    ("kecamatan", COL_KECAMATAN),
    ("resiko_stunting", COL_RISIKO),
    // temporal
    ("tahun", COL_TAHUN),
    ("year", COL_TAHUN),
];

/// Lower-cases and trims a header, then replaces spaces with underscores.
///
/// Only the space character is replaced; inner runs of spaces become runs of
/// underscores.
pub fn normalize_column_name(raw: &str) -> String {
    raw.to_lowercase().trim().replace(' ', "_")
}

/// Normalizes a header and resolves it through [`COLUMN_ALIASES`].
///
/// Names without an alias keep their normalized form.
pub fn canonical_column_name(raw: &str) -> String {
    let normalized = normalize_column_name(raw);
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(normalized)
}
