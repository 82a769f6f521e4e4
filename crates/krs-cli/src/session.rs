//! Line-oriented interactive session.
//!
//! One upload is held in memory at a time. Every `stats` or `render` call
//! recomputes the area statistics for the current selection; parsed uploads
//! stay in the [`UploadCache`] and the classifier is loaded once per process.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use krs_aggregate::RecordFilter;
use krs_classify::ArtifactPaths;
use krs_ingest::UploadCache;
use krs_model::SurveyRecord;
use krs_report::MapOptions;

use crate::pipeline::{
    build_area_report, classify_profile, load_survey_records, parse_profile, parse_selection,
    render_map,
};
use crate::summary::{area_table, assessment_table, dashboard_table, filter_options_lines};

pub const HELP: &str = "\
commands:
  load <path>           load a .csv, .xlsx or .xls upload
  kecamatan <name>      select an area (Semua for all)
  tahun <year>          select a year (Semua for all)
  options               list the available areas and years
  stats                 show dashboard and area tables
  render [path]         write the map (.html, or .geojson/.json)
  classify <json>       classify a family profile given as JSON
  help                  show this list
  quit                  leave the session";

/// A parsed session input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Load(PathBuf),
    Kecamatan(Option<String>),
    Tahun(Option<i64>),
    Options,
    Stats,
    Render(Option<PathBuf>),
    Classify(String),
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "load" if rest.is_empty() => bail!("load needs a file path"),
            "load" => Self::Load(PathBuf::from(rest)),
            "kecamatan" => Self::Kecamatan(parse_selection(rest).map(str::to_string)),
            "tahun" => match parse_selection(rest) {
                None => Self::Tahun(None),
                Some(year) => Self::Tahun(Some(
                    year.parse()
                        .with_context(|| format!("invalid year '{year}'"))?,
                )),
            },
            "options" => Self::Options,
            "stats" => Self::Stats,
            "render" if rest.is_empty() => Self::Render(None),
            "render" => Self::Render(Some(PathBuf::from(rest))),
            "classify" if rest.is_empty() => bail!("classify needs a JSON profile"),
            "classify" => Self::Classify(rest.to_string()),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{other}', type 'help'"),
        };
        Ok(command)
    }
}

/// State of one interactive session.
#[derive(Debug)]
pub struct Session {
    cache: UploadCache,
    records: Vec<SurveyRecord>,
    source: Option<PathBuf>,
    filter: RecordFilter,
    artifacts: ArtifactPaths,
    map_options: MapOptions,
    map_output: PathBuf,
}

impl Session {
    pub fn new(artifacts: ArtifactPaths, map_options: MapOptions, map_output: PathBuf) -> Self {
        Self {
            cache: UploadCache::new(),
            records: Vec::new(),
            source: None,
            filter: RecordFilter::new(),
            artifacts,
            map_options,
            map_output,
        }
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn cache(&self) -> &UploadCache {
        &self.cache
    }

    /// Reads commands from `input` until `quit` or end of input.
    ///
    /// A failing command is reported to `out` and the session continues;
    /// only write failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{HELP}")?;
        for line in input.lines() {
            let line = line.context("read session input")?;
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<SessionCommand>() {
                Ok(command) => command,
                Err(error) => {
                    writeln!(out, "error: {error:#}")?;
                    continue;
                }
            };
            if command == SessionCommand::Quit {
                break;
            }
            if let Err(error) = self.execute(command, out) {
                tracing::warn!(error = %format!("{error:#}"), "session command failed");
                writeln!(out, "error: {error:#}")?;
            }
        }
        Ok(())
    }

    /// Runs a single command, writing its output to `out`.
    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<()> {
        match command {
            SessionCommand::Load(path) => {
                let records = load_survey_records(&mut self.cache, &path)?;
                writeln!(out, "loaded {} records from {}", records.len(), path.display())?;
                self.records = records;
                self.source = Some(path);
                self.filter = RecordFilter::new();
            }
            SessionCommand::Kecamatan(kecamatan) => {
                self.filter.kecamatan = kecamatan;
                writeln!(out, "{}", self.selection())?;
            }
            SessionCommand::Tahun(tahun) => {
                self.filter.tahun = tahun;
                writeln!(out, "{}", self.selection())?;
            }
            SessionCommand::Options => {
                let report = build_area_report(self.loaded()?, &RecordFilter::new())?;
                for line in filter_options_lines(&report.options) {
                    writeln!(out, "{line}")?;
                }
            }
            SessionCommand::Stats => {
                let report = build_area_report(self.loaded()?, &self.filter)?;
                writeln!(out, "{}", dashboard_table(&report.summary))?;
                writeln!(out, "{}", area_table(&report.stats))?;
            }
            SessionCommand::Render(path) => {
                let report = build_area_report(self.loaded()?, &self.filter)?;
                let output = path.unwrap_or_else(|| self.map_output.clone());
                let map = render_map(&report, &output, &self.map_options)?;
                writeln!(
                    out,
                    "map with {} markers written to {}",
                    map.markers.len(),
                    output.display()
                )?;
            }
            SessionCommand::Classify(json) => {
                let profile = parse_profile(&json).context("parse profile")?;
                let assessment = classify_profile(&self.artifacts, &profile)?;
                writeln!(out, "{}", assessment_table(&assessment))?;
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn loaded(&self) -> Result<&[SurveyRecord]> {
        if self.source.is_none() {
            return Err(anyhow!("no upload loaded, use 'load <path>' first"));
        }
        Ok(&self.records)
    }

    fn selection(&self) -> String {
        let kecamatan = self
            .filter
            .kecamatan
            .as_deref()
            .unwrap_or(krs_aggregate::ALL_OPTION);
        let tahun = self
            .filter
            .tahun
            .map_or_else(|| krs_aggregate::ALL_OPTION.to_string(), |t| t.to_string());
        format!("selection: kecamatan={kecamatan} tahun={tahun}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "load data/upload.csv".parse::<SessionCommand>().unwrap(),
            SessionCommand::Load(PathBuf::from("data/upload.csv"))
        );
        assert_eq!(
            "kecamatan Bogor Barat".parse::<SessionCommand>().unwrap(),
            SessionCommand::Kecamatan(Some("Bogor Barat".to_string()))
        );
        assert_eq!(
            "kecamatan Semua".parse::<SessionCommand>().unwrap(),
            SessionCommand::Kecamatan(None)
        );
        assert_eq!(
            "TAHUN 2024".parse::<SessionCommand>().unwrap(),
            SessionCommand::Tahun(Some(2024))
        );
        assert_eq!(
            "render".parse::<SessionCommand>().unwrap(),
            SessionCommand::Render(None)
        );
        assert_eq!(
            "classify {\"baduta\": \"Ya\"}"
                .parse::<SessionCommand>()
                .unwrap(),
            SessionCommand::Classify("{\"baduta\": \"Ya\"}".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("tahun dua".parse::<SessionCommand>().is_err());
        assert!("load".parse::<SessionCommand>().is_err());
        assert!("dance".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn test_stats_before_load_is_reported() {
        let mut session = Session::new(
            ArtifactPaths::default(),
            MapOptions::default(),
            PathBuf::from("map.html"),
        );
        let mut out = Vec::new();
        session.run("stats\nquit\n".as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("error: no upload loaded"));
    }
}
