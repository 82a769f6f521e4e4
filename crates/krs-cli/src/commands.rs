use std::io;

use anyhow::{Context, Result};
use tracing::info_span;

use krs_cli::config::Config;
use krs_cli::pipeline::{
    PreprocessOutcome, apply_overrides, build_area_report, classify_profile, load_profile,
    load_survey_records, preprocess, record_filter, render_map,
};
use krs_cli::session::{Session, SessionCommand};
use krs_cli::summary::{
    area_table, assessment_table, categories_table, dashboard_table, filter_options_lines,
};
use krs_ingest::UploadCache;
use krs_model::FamilyProfile;
use krs_report::write_template;

use crate::cli::{ClassifyArgs, MapArgs, PreprocessArgs, SessionArgs, TemplateArgs};

pub fn run_preprocess(args: &PreprocessArgs, config: &Config) -> Result<PreprocessOutcome> {
    let input = args.input.as_ref().unwrap_or(&config.preprocess.input);
    let output = args.output.as_ref().unwrap_or(&config.preprocess.output);
    preprocess(input, output)
}

pub fn run_classify(args: &ClassifyArgs, config: &Config) -> Result<()> {
    let base = match &args.profile {
        Some(path) => load_profile(path)?,
        None => FamilyProfile::default(),
    };
    let profile = apply_overrides(base, args.overrides())?;
    let paths = config
        .artifacts
        .resolve(args.artifacts.model.as_deref(), args.artifacts.scaler.as_deref());
    let assessment = classify_profile(&paths, &profile)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        println!("{}", assessment_table(&assessment));
        println!("Hasil: {}", assessment.label);
    }
    Ok(())
}

pub fn run_map(args: &MapArgs, config: &Config) -> Result<()> {
    let span = info_span!("map", upload = %args.upload.display());
    let _guard = span.enter();
    let mut cache = UploadCache::new();
    let records = load_survey_records(&mut cache, &args.upload)?;
    let filter = record_filter(args.kecamatan.as_deref(), args.tahun);
    let report = build_area_report(&records, &filter)?;

    for line in filter_options_lines(&report.options) {
        println!("{line}");
    }
    println!("{}", dashboard_table(&report.summary));
    println!("{}", area_table(&report.stats));

    let options = config.map.options(args.zoom, args.icon_dir.as_deref());
    let output = args.output_path(&config.map.output);
    let map = render_map(&report, &output, &options)?;
    println!("Map: {} ({} markers)", output.display(), map.markers.len());
    Ok(())
}

pub fn run_session(args: &SessionArgs, config: &Config) -> Result<()> {
    let paths = config
        .artifacts
        .resolve(args.artifacts.model.as_deref(), args.artifacts.scaler.as_deref());
    let mut session = Session::new(
        paths,
        config.map.options(None, None),
        config.map.output.clone(),
    );
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(upload) = &args.upload {
        session
            .execute(SessionCommand::Load(upload.clone()), &mut out)
            .with_context(|| format!("load {}", upload.display()))?;
    }
    session.run(io::stdin().lock(), &mut out)
}

pub fn run_categories() {
    println!("{}", categories_table());
}

pub fn run_template(args: &TemplateArgs) -> Result<()> {
    write_template(&args.output)
        .with_context(|| format!("write template {}", args.output.display()))?;
    println!("Template: {}", args.output.display());
    Ok(())
}
