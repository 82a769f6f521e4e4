//! Pipeline steps shared by the commands and the interactive session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use krs_aggregate::{
    ALL_OPTION, DashboardSummary, FilterOptions, RecordFilter, compute_area_stats, filter_options,
};
use krs_classify::{ArtifactPaths, RiskAssessment, apply_field, shared_classifier};
use krs_ingest::{UploadCache, load_table};
use krs_model::{AreaStats, FamilyProfile, SurveyRecord};
use krs_normalization::{normalize_schema, normalize_upload};
use krs_report::{MapOptions, RiskMap, write_table};

use crate::logging::redact_value;

/// Row counts of one batch normalization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_in: usize,
    pub rows_out: usize,
}

/// Loads a raw survey export and projects it to the canonical columns.
pub fn normalize_file(input: &Path) -> Result<(DataFrame, DataFrame)> {
    let raw = load_table(input).with_context(|| format!("load {}", input.display()))?;
    let normalized =
        normalize_schema(&raw).with_context(|| format!("normalize {}", input.display()))?;
    Ok((raw, normalized))
}

/// Normalizes `input` and writes the canonical dataset to `output`.
pub fn preprocess(input: &Path, output: &Path) -> Result<PreprocessOutcome> {
    let _span = info_span!("preprocess", input = %input.display()).entered();
    let (raw, normalized) = normalize_file(input)?;
    write_table(&normalized, output).with_context(|| format!("write {}", output.display()))?;
    info!(
        rows_in = raw.height(),
        rows_out = normalized.height(),
        output = %output.display(),
        "preprocessing complete"
    );
    Ok(PreprocessOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        rows_in: raw.height(),
        rows_out: normalized.height(),
    })
}

/// Reads an upload through the cache and normalizes it for the map.
pub fn load_survey_records(cache: &mut UploadCache, path: &Path) -> Result<Vec<SurveyRecord>> {
    let _span = info_span!("load_upload", path = %path.display()).entered();
    let table = cache
        .load_path(path)
        .with_context(|| format!("load {}", path.display()))?;
    let records =
        normalize_upload(&table).with_context(|| format!("normalize {}", path.display()))?;
    info!(records = records.len(), "upload loaded");
    Ok(records)
}

/// Treats `Semua` (any case) as "no restriction".
pub fn parse_selection(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_OPTION) {
        None
    } else {
        Some(value)
    }
}

/// Filter from optional command-line selections.
pub fn record_filter(kecamatan: Option<&str>, tahun: Option<i64>) -> RecordFilter {
    let mut filter = RecordFilter::new();
    if let Some(kecamatan) = kecamatan.and_then(parse_selection) {
        filter = filter.with_kecamatan(kecamatan);
    }
    if let Some(tahun) = tahun {
        filter = filter.with_tahun(tahun);
    }
    filter
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone)]
pub struct AreaReport {
    /// Choices offered by the full, unfiltered dataset.
    pub options: FilterOptions,
    /// Records left after filtering.
    pub records: Vec<SurveyRecord>,
    pub stats: BTreeMap<String, AreaStats>,
    pub summary: DashboardSummary,
}

/// Filters `records` and recomputes the area statistics from scratch.
pub fn build_area_report(records: &[SurveyRecord], filter: &RecordFilter) -> Result<AreaReport> {
    let options = filter_options(records);
    let selected = filter.apply(records)?;
    let stats = compute_area_stats(&selected);
    let summary = DashboardSummary::new(selected.len(), &stats);
    info!(
        records = summary.total_records,
        areas = summary.area_count,
        rentan = summary.rentan_count,
        "area statistics computed"
    );
    Ok(AreaReport {
        options,
        records: selected,
        stats,
        summary,
    })
}

/// Builds the marker map for a report and writes it to `output`.
pub fn render_map(report: &AreaReport, output: &Path, options: &MapOptions) -> Result<RiskMap> {
    let map = RiskMap::build(&report.records, &report.stats, options.zoom)?;
    map.write(output, options)
        .with_context(|| format!("write map {}", output.display()))?;
    Ok(map)
}

/// Reads a family profile from a JSON object keyed by feature name.
pub fn load_profile(path: &Path) -> Result<FamilyProfile> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_profile(&content).with_context(|| format!("parse profile {}", path.display()))
}

/// Parses a family profile from JSON. Missing fields keep their defaults.
pub fn parse_profile(json: &str) -> Result<FamilyProfile> {
    let profile = serde_json::from_str(json)?;
    Ok(profile)
}

/// Applies `(field, option label)` overrides on top of `profile`.
pub fn apply_overrides<'a>(
    mut profile: FamilyProfile,
    overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<FamilyProfile> {
    for (field, value) in overrides {
        apply_field(&mut profile, field, value).with_context(|| format!("set {field}"))?;
    }
    Ok(profile)
}

/// Classifies a profile with the process-wide classifier.
pub fn classify_profile(paths: &ArtifactPaths, profile: &FamilyProfile) -> Result<RiskAssessment> {
    let _span = info_span!("classify").entered();
    if tracing::enabled!(tracing::Level::TRACE) {
        let json = serde_json::to_string(profile)?;
        tracing::trace!(profile = redact_value(&json), "classifying profile");
    }
    let classifier = shared_classifier(paths).context("load classifier artifacts")?;
    let assessment = classifier.assess(profile).context("classify profile")?;
    info!(
        score = assessment.score,
        label = assessment.label.as_str(),
        "profile classified"
    );
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semua_is_no_selection() {
        assert_eq!(parse_selection("Semua"), None);
        assert_eq!(parse_selection(" semua "), None);
        assert_eq!(parse_selection("Bogor Barat"), Some("Bogor Barat"));
    }

    #[test]
    fn test_record_filter_from_flags() {
        let filter = record_filter(Some("Semua"), Some(2024));
        assert_eq!(filter.kecamatan, None);
        assert_eq!(filter.tahun, Some(2024));
        assert!(record_filter(None, None).is_unrestricted());
    }

    #[test]
    fn test_overrides_apply_on_top_of_profile() {
        let profile = parse_profile(r#"{"baduta": "Ya"}"#).unwrap();
        let profile = apply_overrides(
            profile,
            [("balita", "Ya"), ("sumber_air_layak_tidak", "Air hujan")],
        )
        .unwrap();
        assert_eq!(profile.baduta, krs_model::Answer::Ya);
        assert_eq!(profile.balita, krs_model::Answer::Ya);
        assert_eq!(profile.sumber_air_layak_tidak, krs_model::WaterSource::AirHujan);
    }

    #[test]
    fn test_unknown_option_names_the_field() {
        let err = apply_overrides(FamilyProfile::default(), [("pus", "mungkin")]).unwrap_err();
        assert_eq!(err.to_string(), "set pus");
    }
}
