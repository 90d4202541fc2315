// Device record reader
//
// Opens a capture file read-only, validates the `devices` schema, and runs
// the single fixed projection the export pipeline consumes.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, trace};

use crate::error::StoreError;
use crate::row::{DEVICE_COLUMNS, DEVICES_TABLE, RawDeviceRow};

/// A read-only handle on a Kismet capture database.
///
/// The schema is checked once in [`CaptureStore::open`]; a handle that
/// exists is known to carry a `devices` table with every column
/// [`RawDeviceRow`] needs.
pub struct CaptureStore {
    conn: Connection,
    path: PathBuf,
}

impl CaptureStore {
    /// Open `path` read-only and verify the `devices` table shape.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(StoreError::NotFound { path });
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;

        // SQLite opens lazily: a non-database file only fails on first read,
        // so the first schema probe doubles as the "is this a database" check.
        let has_table: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [DEVICES_TABLE],
                |row| row.get(0),
            )
            .map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;
        if !has_table {
            return Err(StoreError::MissingTable {
                table: DEVICES_TABLE,
            });
        }

        let store = Self { conn, path };
        store.check_columns()?;
        debug!(path = %store.path.display(), "opened capture store");
        Ok(store)
    }

    /// Path the store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every device row, in store order.
    pub fn read_devices(&self) -> Result<Vec<RawDeviceRow>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT * FROM devices")?;
        let rows = stmt
            .query_map([], RawDeviceRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = rows.len(), "read device rows");
        Ok(rows)
    }

    fn check_columns(&self) -> Result<(), StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({DEVICES_TABLE})"))?;
        let present = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        trace!(?present, "devices table columns");

        let missing: Vec<&'static str> = DEVICE_COLUMNS
            .iter()
            .copied()
            .filter(|wanted| !present.iter().any(|c| c.eq_ignore_ascii_case(wanted)))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StoreError::MissingColumns {
                table: DEVICES_TABLE,
                columns: missing,
            })
        }
    }
}
