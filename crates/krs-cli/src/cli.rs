//! CLI argument definitions.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "krs",
    version,
    about = "Stunting risk toolkit - preprocess survey data, classify families, map risk areas",
    long_about = "Stunting risk toolkit for family survey (KRS) data.\n\n\
                  Normalizes raw survey exports, classifies single family profiles with\n\
                  the trained sequence model, and maps kecamatan risk status under the\n\
                  WHO rule (>20% Berisiko = Rentan Stunting)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow household answers in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: ./krs.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a raw survey export into the six canonical columns.
    Preprocess(PreprocessArgs),

    /// Classify one family profile as Berisiko or Tidak Berisiko.
    Classify(ClassifyArgs),

    /// Aggregate an upload by kecamatan and render the risk map.
    Map(MapArgs),

    /// Interactive session over stdin.
    Session(SessionArgs),

    /// List water source and welfare options with their codes.
    Categories,

    /// Write a sample upload with the expected columns.
    Template(TemplateArgs),
}

#[derive(Parser)]
pub struct PreprocessArgs {
    /// Raw survey export (.xlsx, .xls or .csv).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output dataset (.xlsx or .csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Model and scaler locations.
#[derive(Args)]
pub struct ArtifactArgs {
    /// Exported model (JSON).
    #[arg(long = "model", value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Exported scaler (JSON).
    #[arg(long = "scaler", value_name = "PATH")]
    pub scaler: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// JSON profile keyed by feature name; flags below override its fields.
    #[arg(long = "profile", value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Has a child aged 0-24 months.
    #[arg(long, value_enum)]
    pub baduta: Option<AnswerArg>,

    /// Has a child aged 0-59 months.
    #[arg(long, value_enum)]
    pub balita: Option<AnswerArg>,

    /// Couple of fertile age.
    #[arg(long, value_enum)]
    pub pus: Option<AnswerArg>,

    /// Someone in the household is pregnant.
    #[arg(long = "pus-hamil", value_enum)]
    pub pus_hamil: Option<AnswerArg>,

    /// Main water source label (see `krs categories`).
    #[arg(long = "water-source", value_name = "LABEL")]
    pub water_source: Option<String>,

    /// Toilet does not meet the sanitation standard.
    #[arg(long = "jamban-layak-tidak", value_enum)]
    pub jamban_layak_tidak: Option<AnswerArg>,

    /// Mother younger than 20.
    #[arg(long = "terlalu-muda", value_enum)]
    pub terlalu_muda: Option<AnswerArg>,

    /// Mother older than 35.
    #[arg(long = "terlalu-tua", value_enum)]
    pub terlalu_tua: Option<AnswerArg>,

    /// Birth spacing under 2 years.
    #[arg(long = "terlalu-dekat", value_enum)]
    pub terlalu_dekat: Option<AnswerArg>,

    /// More than 4 children.
    #[arg(long = "terlalu-banyak", value_enum)]
    pub terlalu_banyak: Option<AnswerArg>,

    /// Not using modern contraception.
    #[arg(long = "bukan-peserta-kb-modern", value_enum)]
    pub bukan_peserta_kb_modern: Option<AnswerArg>,

    /// Welfare rank label (see `krs categories`).
    #[arg(long = "welfare", value_name = "LABEL")]
    pub welfare: Option<String>,

    /// Print the assessment as JSON.
    #[arg(long = "json")]
    pub json: bool,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

impl ClassifyArgs {
    /// Field overrides given on the command line, as `(feature, label)`.
    pub fn overrides(&self) -> Vec<(&'static str, &str)> {
        let answers = [
            ("baduta", self.baduta),
            ("balita", self.balita),
            ("pus", self.pus),
            ("pus_hamil", self.pus_hamil),
            ("jamban_layak_tidak", self.jamban_layak_tidak),
            ("terlalu_muda", self.terlalu_muda),
            ("terlalu_tua", self.terlalu_tua),
            ("terlalu_dekat", self.terlalu_dekat),
            ("terlalu_banyak", self.terlalu_banyak),
            ("bukan_peserta_kb_modern", self.bukan_peserta_kb_modern),
        ];
        let mut overrides: Vec<(&'static str, &str)> = answers
            .into_iter()
            .filter_map(|(field, answer)| answer.map(|answer| (field, answer.label())))
            .collect();
        if let Some(label) = self.water_source.as_deref() {
            overrides.push(("sumber_air_layak_tidak", label));
        }
        if let Some(label) = self.welfare.as_deref() {
            overrides.push(("kesejahteraan_prioritas", label));
        }
        overrides
    }
}

#[derive(Parser)]
pub struct MapArgs {
    /// Upload with namakecamatan, risiko_stunting, lat, lon (and optionally tahun).
    #[arg(value_name = "UPLOAD")]
    pub upload: PathBuf,

    /// Only this kecamatan (Semua for all).
    #[arg(long = "kecamatan", value_name = "NAME")]
    pub kecamatan: Option<String>,

    /// Only this year.
    #[arg(long = "tahun", value_name = "YEAR")]
    pub tahun: Option<i64>,

    /// Map output (.html, or .geojson/.json for GeoJSON).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write GeoJSON instead of HTML.
    #[arg(long = "geojson")]
    pub geojson: bool,

    /// Initial zoom level.
    #[arg(long = "zoom")]
    pub zoom: Option<u8>,

    /// Directory with marker_green.png and marker_red.png.
    #[arg(long = "icon-dir", value_name = "DIR")]
    pub icon_dir: Option<PathBuf>,
}

impl MapArgs {
    /// Output path, switched to `.geojson` when `--geojson` is set.
    pub fn output_path(&self, configured: &Path) -> PathBuf {
        let path = self
            .output
            .clone()
            .unwrap_or_else(|| configured.to_path_buf());
        if self.geojson {
            path.with_extension("geojson")
        } else {
            path
        }
    }
}

#[derive(Parser)]
pub struct SessionArgs {
    /// Upload to load before reading commands.
    #[arg(value_name = "UPLOAD")]
    pub upload: Option<PathBuf>,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

#[derive(Parser)]
pub struct TemplateArgs {
    /// Template output (.xlsx or .csv).
    #[arg(
        long = "output",
        short = 'o',
        value_name = "PATH",
        default_value = "contoh_struktur_data.xlsx"
    )]
    pub output: PathBuf,
}

/// Binary questionnaire answer.
#[derive(Clone, Copy, ValueEnum)]
pub enum AnswerArg {
    Ya,
    Tidak,
}

impl AnswerArg {
    fn label(self) -> &'static str {
        match self {
            Self::Ya => "Ya",
            Self::Tidak => "Tidak",
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
