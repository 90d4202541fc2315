// ── Raw device rows ──
//
// One typed struct per row of the `devices` table, populated once at read
// time from the fixed column set. Nothing downstream indexes by column name.

use rusqlite::Row;
use rusqlite::types::ValueRef;

/// Name of the table every capture file stores its devices in.
pub const DEVICES_TABLE: &str = "devices";

/// Columns a `devices` table must carry for the row to be readable.
pub const DEVICE_COLUMNS: &[&str] = &[
    "first_time",
    "last_time",
    "phyname",
    "devmac",
    "strongest_signal",
    "min_lat",
    "min_lon",
    "max_lat",
    "max_lon",
    "avg_lat",
    "avg_lon",
    "bytes_data",
    "type",
    "device",
];

/// Bounding box and average position recorded by the capture tool itself.
///
/// Older capture generations store these as integers scaled by 100 000,
/// newer ones as plain degrees. Values are kept as read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoSummary {
    pub min_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lat: Option<f64>,
    pub max_lon: Option<f64>,
    pub avg_lat: Option<f64>,
    pub avg_lon: Option<f64>,
}

/// A single observed device, exactly as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDeviceRow {
    /// First time the device was seen, epoch seconds.
    pub first_time: i64,
    /// Last time the device was seen, epoch seconds.
    pub last_time: i64,
    pub phyname: Option<String>,
    pub devmac: Option<String>,
    pub strongest_signal: Option<i64>,
    pub geo: GeoSummary,
    pub bytes_data: Option<i64>,
    /// Declared device type, e.g. `"Wi-Fi AP"`. `None` when the column is NULL.
    pub device_type: Option<String>,
    /// Serialized attribute tree. TEXT and BLOB storage both land here.
    pub device: Vec<u8>,
}

impl RawDeviceRow {
    /// Build a row from a `SELECT *` result whose columns were already checked.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            first_time: opt_i64(row, "first_time")?.unwrap_or_default(),
            last_time: opt_i64(row, "last_time")?.unwrap_or_default(),
            phyname: opt_text(row, "phyname")?,
            devmac: opt_text(row, "devmac")?,
            strongest_signal: opt_i64(row, "strongest_signal")?,
            geo: GeoSummary {
                min_lat: opt_f64(row, "min_lat")?,
                min_lon: opt_f64(row, "min_lon")?,
                max_lat: opt_f64(row, "max_lat")?,
                max_lon: opt_f64(row, "max_lon")?,
                avg_lat: opt_f64(row, "avg_lat")?,
                avg_lon: opt_f64(row, "avg_lon")?,
            },
            bytes_data: opt_i64(row, "bytes_data")?,
            device_type: opt_text(row, "type")?,
            device: bytes(row, "device")?,
        })
    }
}

// ── Column readers ───────────────────────────────────────────────────
//
// SQLite is dynamically typed; capture files written by different tool
// versions disagree on INTEGER vs REAL vs TEXT for the same column.

#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
fn opt_i64(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Integer(v) => Some(v),
        ValueRef::Real(v) => Some(v as i64),
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(|s| s.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn opt_f64(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Integer(v) => Some(v as f64),
        ValueRef::Real(v) => Some(v),
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(|s| s.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn opt_text(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Integer(v) => Some(v.to_string()),
        ValueRef::Real(v) => Some(v.to_string()),
        ValueRef::Null => None,
    })
}

fn bytes(row: &Row<'_>, column: &str) -> rusqlite::Result<Vec<u8>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Text(t) | ValueRef::Blob(t) => t.to_vec(),
        ValueRef::Integer(v) => v.to_string().into_bytes(),
        ValueRef::Real(v) => v.to_string().into_bytes(),
        ValueRef::Null => Vec::new(),
    })
}
