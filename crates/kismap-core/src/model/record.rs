// ── Canonical device records ──
//
// One record per decoded row. Field groups are shared between the two
// record shapes; serde names match the JSON export document.

use serde::{Deserialize, Serialize};

use super::ids::{DeviceKey, MacAddress};

/// Fields every device carries regardless of partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonFields {
    #[serde(rename = "Type")]
    pub device_type: String,
    #[serde(rename = "First Seen")]
    pub first_seen: String,
    #[serde(rename = "Last Seen")]
    pub last_seen: String,
    #[serde(rename = "Device MAC")]
    pub mac: MacAddress,
    #[serde(rename = "Common Name")]
    pub name: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Key")]
    pub key: DeviceKey,
}

/// Fix modes at or below this carry no usable position.
pub const MIN_FIX_MODE: i64 = 1;

/// One historical position sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Signal")]
    pub signal: i64,
    #[serde(rename = "Time", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Best fix plus the full history it was chosen from.
///
/// Coordinates come from the strongest history sample, or from the
/// capture tool's peak-signal location when there is no history. A device
/// that was never located carries the (0, 0) sentinel. Use
/// [`LocationFields::has_fix`], not the coordinates, to tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFields {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Locations", default)]
    pub history: Vec<Fix>,
    /// GPS fix mode of the peak-signal location (0/1 none, 2 = 2D, 3 = 3D).
    #[serde(rename = "FixMode", default, skip_serializing_if = "Option::is_none")]
    pub fix_mode: Option<i64>,
}

impl LocationFields {
    pub fn unfixed() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            history: Vec::new(),
            fix_mode: None,
        }
    }

    /// Located by history, or by a peak-signal location with at least a
    /// 2D fix.
    pub fn has_fix(&self) -> bool {
        !self.history.is_empty() || self.fix_mode.is_some_and(|mode| mode > MIN_FIX_MODE)
    }
}

impl Default for LocationFields {
    fn default() -> Self {
        Self::unfixed()
    }
}

/// A client seen associated with an access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLink {
    #[serde(rename = "Key")]
    pub key: DeviceKey,
    /// The client's own MAC when it resolved against the client partition,
    /// otherwise the MAC the AP recorded for it.
    #[serde(rename = "Device MAC")]
    pub mac: MacAddress,
}

/// An access point a station was seen associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApLink {
    #[serde(rename = "Key")]
    pub key: DeviceKey,
    #[serde(rename = "BSSID")]
    pub bssid: MacAddress,
    /// Filled in by the link stage when `key` names a known AP.
    #[serde(rename = "SSID", default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
}

/// A network name a device was heard probing for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    #[serde(rename = "SSID")]
    pub ssid: String,
}

/// Access point record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub location: LocationFields,
    /// Most recently advertised network name, `""` when never seen.
    #[serde(rename = "SSID", default)]
    pub ssid: String,
    #[serde(rename = "Clients", default)]
    pub clients: Vec<ClientLink>,
}

/// Client, bridged or unclassified device record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub location: LocationFields,
    #[serde(rename = "APs", default)]
    pub aps: Vec<ApLink>,
    #[serde(rename = "Probes", default)]
    pub probes: Vec<Probe>,
}

impl StationRecord {
    pub fn is_associated(&self) -> bool {
        !self.aps.is_empty()
    }
}
