// Configuration loading and parsing (pipeline.toml).
//
// The config names the season and the three data directories. Raw files
// are expected under `<raw_dir>/<season>/<tier>/` (batting.csv,
// pitching.csv, fielding.csv, standings_<sub-league>.csv), reference
// tables under `<reference_dir>` (park_factors.csv, fip_const.csv), and
// derived tables land under `<out_dir>/<season>/<tier>/`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

/// The assembled pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Season year; `None` means "use the current year".
    pub season: Option<u16>,
    pub paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub raw_dir: String,
    pub reference_dir: String,
    pub out_dir: String,
}

/// Raw deserialization target for the whole pipeline.toml file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    season: Option<SeasonSection>,
    paths: DataPaths,
}

#[derive(Debug, Deserialize)]
struct SeasonSection {
    year: u16,
}

/// Load and validate configuration from a pipeline.toml file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        season: file.season.map(|s| s.year),
        paths: file.paths,
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    // The fielding feed this pipeline understands starts publishing
    // defensive-run components in 2020.
    if let Some(season) = config.season {
        if season < 2020 {
            return Err(ConfigError::ValidationError {
                field: "season.year".into(),
                message: format!("must be 2020 or later, got {season}"),
            });
        }
    }

    let path_fields: &[(&str, &str)] = &[
        ("paths.raw_dir", &config.paths.raw_dir),
        ("paths.reference_dir", &config.paths.reference_dir),
        ("paths.out_dir", &config.paths.out_dir),
    ];
    for (field, value) in path_fields {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}
