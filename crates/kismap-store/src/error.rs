use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `kismap-store` crate.
///
/// Every variant is fatal to an export run: the capture store is read
/// exactly once and there is nothing to retry. `kismap-core` wraps these
/// into its own error type.
#[derive(Debug, Error)]
pub enum StoreError {
    // ── Opening ─────────────────────────────────────────────────────
    /// The capture file does not exist.
    #[error("Capture file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// SQLite refused to open the file (not a database, permissions, ...).
    #[error("Cannot open capture file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    // ── Schema ──────────────────────────────────────────────────────
    /// The store has no `devices` table.
    #[error("Capture file has no '{table}' table")]
    MissingTable { table: &'static str },

    /// The `devices` table lacks one or more mandatory columns.
    #[error("Table '{table}' is missing columns: {}", columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<&'static str>,
    },

    // ── Query ───────────────────────────────────────────────────────
    /// The fixed projection failed while running or while reading a row.
    #[error("Query against capture file failed: {0}")]
    Query(#[from] rusqlite::Error),
}
