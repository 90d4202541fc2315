//! CLI error types with miette diagnostics.
//!
//! Maps store, core and config errors into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use kismap_config::ConfigError;
use kismap_core::CoreError;
use kismap_store::StoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const STORE: i32 = 3;
    pub const ROW: i32 = 4;
    pub const WRITE: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Capture file ─────────────────────────────────────────────────

    #[error("Capture file not found: {path}")]
    #[diagnostic(
        code(kismap::capture_not_found),
        help("Pass the path of a Kismet capture database (*.kismet).")
    )]
    CaptureNotFound { path: String },

    #[error("{path} is not a readable Kismet capture")]
    #[diagnostic(
        code(kismap::not_a_capture),
        help(
            "The file must be a SQLite database with a `devices` table, as written\n\
             by Kismet 2019 and later."
        )
    )]
    NotACapture {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to read devices from {path}")]
    #[diagnostic(code(kismap::store))]
    Store {
        path: String,
        #[source]
        source: StoreError,
    },

    // ── Rows ─────────────────────────────────────────────────────────

    #[error("Malformed device row")]
    #[diagnostic(
        code(kismap::bad_row),
        help("Run without --strict to skip malformed rows and export the rest.")
    )]
    BadRow {
        #[source]
        source: CoreError,
    },

    // ── Output ───────────────────────────────────────────────────────

    #[error("Could not write {path}")]
    #[diagnostic(
        code(kismap::write_failed),
        help("Check that the output directory exists and is writable, or pick another path with --kml / --json.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render export")]
    #[diagnostic(code(kismap::render))]
    Render {
        #[source]
        source: CoreError,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(kismap::config),
        help("Check the config file and KISMAP_* environment variables.\nRun: kismap config path")
    )]
    Config(#[from] ConfigError),

    #[error("Config file already exists: {path}")]
    #[diagnostic(
        code(kismap::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("failed to serialize config: {0}")]
    #[diagnostic(code(kismap::config))]
    ConfigSerialize(#[from] toml::ser::Error),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CaptureNotFound { .. } | Self::NotACapture { .. } | Self::Store { .. } => {
                exit_code::STORE
            }
            Self::BadRow { .. } => exit_code::ROW,
            Self::Write { .. } | Self::Render { .. } => exit_code::WRITE,
            Self::Config(_) | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::ConfigSerialize(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Wrap a store failure for the capture at `path`.
    pub fn from_store(path: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::CaptureNotFound { path: path.into() },
            StoreError::Open { .. }
            | StoreError::MissingTable { .. }
            | StoreError::MissingColumns { .. } => Self::NotACapture {
                path: path.into(),
                source: err,
            },
            StoreError::Query(_) => Self::Store {
                path: path.into(),
                source: err,
            },
        }
    }

    /// Wrap a core failure for the capture at `path`.
    pub fn from_core(path: &str, err: CoreError) -> Self {
        match err {
            CoreError::Store(inner) => Self::from_store(path, inner),
            CoreError::Write { path, source } => Self::Write {
                path: path.display().to_string(),
                source,
            },
            err if err.is_row_local() => Self::BadRow { source: err },
            err => Self::Render { source: err },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn store_errors_map_to_store_exit_code() {
        let missing = CliError::from_store(
            "a.kismet",
            StoreError::NotFound {
                path: PathBuf::from("a.kismet"),
            },
        );
        assert!(matches!(missing, CliError::CaptureNotFound { .. }));
        assert_eq!(missing.exit_code(), exit_code::STORE);

        let no_table = CliError::from_store("a.kismet", StoreError::MissingTable { table: "devices" });
        assert!(matches!(no_table, CliError::NotACapture { .. }));
        assert_eq!(no_table.exit_code(), exit_code::STORE);
    }

    #[test]
    fn core_errors_map_by_kind() {
        let row = CliError::from_core(
            "a.kismet",
            CoreError::MissingField {
                device: "AA:BB".into(),
                field: "kismet.device.base.key",
            },
        );
        assert_eq!(row.exit_code(), exit_code::ROW);

        let write = CliError::from_core(
            "a.kismet",
            CoreError::Write {
                path: PathBuf::from("/nope/a.kml"),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert!(matches!(&write, CliError::Write { path, .. } if path == "/nope/a.kml"));
        assert_eq!(write.exit_code(), exit_code::WRITE);

        let wrapped = CliError::from_core(
            "a.kismet",
            CoreError::Store(StoreError::NotFound {
                path: PathBuf::from("a.kismet"),
            }),
        );
        assert_eq!(wrapped.exit_code(), exit_code::STORE);
    }
}
