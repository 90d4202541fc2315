//! Read-only access to the `devices` table of Kismet capture databases.

pub mod error;
pub mod reader;
pub mod row;

pub use error::StoreError;
pub use reader::CaptureStore;
pub use row::{DEVICE_COLUMNS, DEVICES_TABLE, GeoSummary, RawDeviceRow};
