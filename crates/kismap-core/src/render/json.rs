// JSON export
//
// The record set serializes as
// `{ clients, aps, bridged, other, probes }`, pretty-printed.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::CoreError;
use crate::pipeline::RecordSet;

/// Pretty-printed JSON export document.
pub fn to_json_string(records: &RecordSet) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse an export document back into a record set.
pub fn from_json_str(json: &str) -> Result<RecordSet, CoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Write the export document to `path`. Returns the rendered text so callers
/// can echo it without serializing twice.
pub fn write_json_file(records: &RecordSet, path: &Path) -> Result<String, CoreError> {
    let json = to_json_string(records)?;
    fs::write(path, format!("{json}\n")).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), records = records.len(), "wrote JSON");
    Ok(json)
}
