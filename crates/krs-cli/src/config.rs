//! Optional `krs.toml` settings.
//!
//! Every section and field has a default, so a partial file (or no file at
//! all) is valid. Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use krs_classify::{ArtifactPaths, DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH};
use krs_report::{DEFAULT_ZOOM, MapOptions};
use serde::{Deserialize, Serialize};

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "krs.toml";

/// Raw survey export read by `preprocess` by default.
pub const DEFAULT_PREPROCESS_INPUT: &str = "KRS - 3201 Bogor Th. 2024.xlsx";

/// Normalized dataset written by `preprocess` by default.
pub const DEFAULT_PREPROCESS_OUTPUT: &str = "dataset_stunting_preprocessed.xlsx";

pub const DEFAULT_MAP_OUTPUT: &str = "peta_rentan_stunting.html";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub artifacts: ArtifactSettings,
    pub preprocess: PreprocessSettings,
    pub map: MapSettings,
}

/// Locations of the exported model and scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactSettings {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scaler_path: PathBuf::from(DEFAULT_SCALER_PATH),
        }
    }
}

impl ArtifactSettings {
    /// Artifact paths with optional per-command overrides applied.
    pub fn resolve(&self, model: Option<&Path>, scaler: Option<&Path>) -> ArtifactPaths {
        ArtifactPaths {
            model: model.map_or_else(|| self.model_path.clone(), Path::to_path_buf),
            scaler: scaler.map_or_else(|| self.scaler_path.clone(), Path::to_path_buf),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessSettings {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_PREPROCESS_INPUT),
            output: PathBuf::from(DEFAULT_PREPROCESS_OUTPUT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub output: PathBuf,
    pub zoom: u8,
    /// Directory with `marker_green.png` and `marker_red.png`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_dir: Option<PathBuf>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_MAP_OUTPUT),
            zoom: DEFAULT_ZOOM,
            icon_dir: None,
        }
    }
}

impl MapSettings {
    /// Render options with optional per-command overrides applied.
    pub fn options(&self, zoom: Option<u8>, icon_dir: Option<&Path>) -> MapOptions {
        MapOptions {
            zoom: zoom.unwrap_or(self.zoom),
            icon_dir: icon_dir.map(Path::to_path_buf).or_else(|| self.icon_dir.clone()),
            ..MapOptions::default()
        }
    }
}

impl Config {
    /// Loads settings from `explicit`, or from [`DEFAULT_CONFIG_FILE`] when
    /// no path is given.
    ///
    /// A missing default file yields the defaults. An explicit file that
    /// cannot be read, and any file that does not parse, is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };
        Self::load_from(&path)
    }

    /// Loads settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config =
            Self::from_toml_str(&content).with_context(|| format!("parse config {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
[map]
zoom = 10
"#,
        )
        .unwrap();
        assert_eq!(config.map.zoom, 10);
        assert_eq!(config.map.output, PathBuf::from(DEFAULT_MAP_OUTPUT));
        assert_eq!(config.artifacts, ArtifactSettings::default());
        assert_eq!(config.preprocess, PreprocessSettings::default());
    }

    #[test]
    fn test_flags_override_file_values() {
        let settings = MapSettings {
            icon_dir: Some(PathBuf::from("assets")),
            ..MapSettings::default()
        };
        let options = settings.options(Some(14), None);
        assert_eq!(options.zoom, 14);
        assert_eq!(options.icon_dir, Some(PathBuf::from("assets")));

        let paths = ArtifactSettings::default().resolve(Some(Path::new("m.json")), None);
        assert_eq!(paths.model, PathBuf::from("m.json"));
        assert_eq!(paths.scaler, PathBuf::from(DEFAULT_SCALER_PATH));
    }

    #[test]
    fn test_unknown_value_type_is_rejected() {
        assert!(Config::from_toml_str("[map]\nzoom = \"close\"\n").is_err());
    }
}
