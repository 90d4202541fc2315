// ── Core identity types ──
//
// DeviceKey and MacAddress appear on every record and on every cross-link
// between records. Both keep the captured text verbatim: the capture tool
// already writes MACs in a single canonical case, and exports must match
// what other tools reading the same capture show.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DeviceKey ───────────────────────────────────────────────────────

/// Stable per-device key assigned by the capture tool
/// (`kismet.device.base.key`, e.g. `4202770D00000000_3C8A4E10B6DF`).
///
/// Cross-links between partitions are expressed in keys, never MACs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceKey(String);

impl DeviceKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for DeviceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DeviceKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── MacAddress ──────────────────────────────────────────────────────

/// Hardware address as captured. Surrounding whitespace is trimmed, case is
/// preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
