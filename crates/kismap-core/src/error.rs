// ── Core error types ──
//
// Row-local failures (Decode, MissingField) are contained by the pipeline
// according to its `RowPolicy`. Everything else ends the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::tree::DecodeError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Row-local errors ─────────────────────────────────────────────
    #[error("Device {device}: malformed attribute blob: {source}")]
    Decode {
        device: String,
        #[source]
        source: DecodeError,
    },

    #[error("Device {device}: missing mandatory field '{field}'")]
    MissingField { device: String, field: &'static str },

    // ── Storage errors (wrapped) ─────────────────────────────────────
    #[error(transparent)]
    Store(#[from] kismap_store::StoreError),

    // ── Render errors ────────────────────────────────────────────────
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether this error concerns a single device row rather than the run.
    pub fn is_row_local(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::MissingField { .. })
    }
}
