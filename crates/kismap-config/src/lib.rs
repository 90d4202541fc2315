//! Configuration for the kismap exporter.
//!
//! A single TOML file holding output defaults and KML presentation
//! settings, layered under `KISMAP_` environment variables. The CLI applies
//! its own flags on top of the loaded values.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kismap_core::render::kml::{DEFAULT_DOCUMENT_NAME, DEFAULT_ICON_HREF};
use kismap_core::{KmlOptions, PipelineOptions, RowPolicy, TimeStyle};

/// Prefix for environment overrides. Nested keys use `__`, so
/// `KISMAP_OUTPUT__STRICT=true` sets `output.strict`.
pub const ENV_PREFIX: &str = "KISMAP_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputDefaults,

    #[serde(default)]
    pub kml: KmlDefaults,
}

/// Defaults for the flags of the same names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputDefaults {
    /// Write outputs beside the capture file.
    #[serde(default)]
    pub inplace: bool,

    /// Echo the JSON document to stdout.
    #[serde(default)]
    pub print_json: bool,

    #[serde(default)]
    pub local_time: bool,

    /// Abort on the first bad row.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KmlDefaults {
    #[serde(default = "default_icon_href")]
    pub icon_href: String,

    #[serde(default = "default_document_name")]
    pub document_name: String,
}

impl Default for KmlDefaults {
    fn default() -> Self {
        Self {
            icon_href: default_icon_href(),
            document_name: default_document_name(),
        }
    }
}

fn default_icon_href() -> String {
    DEFAULT_ICON_HREF.into()
}
fn default_document_name() -> String {
    DEFAULT_DOCUMENT_NAME.into()
}

impl Config {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            row_policy: if self.output.strict {
                RowPolicy::Abort
            } else {
                RowPolicy::Skip
            },
            time_style: if self.output.local_time {
                TimeStyle::Local
            } else {
                TimeStyle::Utc
            },
        }
    }

    pub fn kml_options(&self) -> KmlOptions {
        KmlOptions {
            document_name: self.kml.document_name.clone(),
            icon_href: self.kml.icon_href.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.kml.icon_href.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "kml.icon_href".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "kismap", "kismap").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("kismap");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load defaults ⇒ TOML file ⇒ environment.
///
/// An explicit `path` must exist; the platform default is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(explicit) if !explicit.is_file() => {
            return Err(ConfigError::NotFound {
                path: explicit.to_path_buf(),
            });
        }
        Some(explicit) => explicit.to_path_buf(),
        None => config_path(),
    };

    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (default: the
/// platform config path).
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}
