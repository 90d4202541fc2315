// ── Device attribute trees ──
//
// The `device` column holds a JSON document keyed by dotted, namespaced
// field names. Capabilities a device never exhibited simply have no
// namespace, so every lookup is optional: absence is `None`, never an error.

use serde_json::Value;
use thiserror::Error;

/// Well-known field paths inside a device tree.
pub mod keys {
    pub const BASE_KEY: &str = "kismet.device.base.key";
    pub const BASE_MACADDR: &str = "kismet.device.base.macaddr";
    pub const BASE_TYPE: &str = "kismet.device.base.type";
    pub const BASE_COMMONNAME: &str = "kismet.device.base.commonname";
    pub const BASE_NAME: &str = "kismet.device.base.name";
    pub const BASE_CHANNEL: &str = "kismet.device.base.channel";

    pub const LOCATION_CLOUD: &str = "kismet.device.base.location_cloud";
    pub const RRD_SAMPLES: &str = "kis.gps.rrd.samples_100";
    pub const HISTORIC_GEOPOINT: &str = "kismet.historic.location.geopoint";
    pub const HISTORIC_SIGNAL: &str = "kismet.historic.location.signal";
    pub const HISTORIC_TIME: &str = "kismet.historic.location.time_sec";

    pub const BASE_SIGNAL: &str = "kismet.device.base.signal";
    pub const PEAK_LOC: &str = "kismet.common.signal.peak_loc";
    pub const LOCATION_GEOPOINT: &str = "kismet.common.location.geopoint";
    pub const LOCATION_FIX: &str = "kismet.common.location.fix";

    pub const DOT11: &str = "dot11.device";
    pub const CLIENT_MAP: &str = "dot11.device.client_map";
    pub const CLIENT_BSSID: &str = "dot11.client.bssid";
    pub const CLIENT_BSSID_KEY: &str = "dot11.client.bssid_key";
    pub const ASSOCIATED_CLIENT_MAP: &str = "dot11.device.associated_client_map";
    pub const PROBED_SSID_MAP: &str = "dot11.device.probed_ssid_map";
    pub const PROBED_SSID: &str = "dot11.probedssid.ssid";
    pub const LAST_BEACONED_SSID_RECORD: &str = "dot11.device.last_beaconed_ssid_record";
    pub const ADVERTISED_SSID: &str = "dot11.advertisedssid.ssid";
    pub const LAST_BEACONED_SSID: &str = "dot11.device.last_beaconed_ssid";
}

/// Why an attribute blob could not be turned into a [`DeviceTree`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("top level is {found}, expected an object")]
    NotAnObject { found: &'static str },
}

/// Read-only view over one decoded device blob.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTree {
    root: Value,
}

impl DeviceTree {
    /// Parse a raw blob. Surrounding whitespace and a trailing NUL, which
    /// some capture generations append to TEXT columns, are tolerated.
    pub fn decode(blob: &[u8]) -> Result<Self, DecodeError> {
        let trimmed = blob
            .strip_suffix(b"\0")
            .unwrap_or(blob)
            .trim_ascii();
        Self::from_value(serde_json::from_slice(trimmed)?)
    }

    pub fn from_value(root: Value) -> Result<Self, DecodeError> {
        if root.is_object() {
            Ok(Self { root })
        } else {
            Err(DecodeError::NotAnObject {
                found: kind(&root),
            })
        }
    }

    /// Walk `path` from the root. `None` as soon as any segment is absent.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        lookup(&self.root, path)
    }

    /// String at `path`; empty strings count as absent.
    pub fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.get(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn i64_at(&self, path: &[&str]) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }
}

/// Optional path lookup over any JSON value, used for nested sub-records
/// (history samples, map entries) as well as the tree root.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, segment| node.as_object()?.get(*segment))
        .filter(|v| !v.is_null())
}

/// Collection entries at a namespace that capture generations store either
/// as an array or as an object keyed by an id. Anything else is empty.
pub fn entries(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> DeviceTree {
        DeviceTree::from_value(value).unwrap()
    }

    #[test]
    fn decode_object_blob() {
        let t = DeviceTree::decode(br#"{"kismet.device.base.key": "K1"}"#).unwrap();
        assert_eq!(t.str_at(&[keys::BASE_KEY]), Some("K1"));
    }

    #[test]
    fn decode_tolerates_trailing_nul_and_whitespace() {
        let t = DeviceTree::decode(b"  {\"a\": 1}\n\0").unwrap();
        assert_eq!(t.i64_at(&["a"]), Some(1));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let err = DeviceTree::decode(b"{\"a\": ").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
        assert!(matches!(
            DeviceTree::decode(b"").unwrap_err(),
            DecodeError::Syntax(_)
        ));
    }

    #[test]
    fn decode_rejects_non_object() {
        let err = DeviceTree::decode(b"[1, 2]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn nested_lookup_present_and_absent() {
        let t = tree(json!({
            "dot11.device": { "dot11.device.last_beaconed_ssid": "Home" }
        }));
        assert_eq!(
            t.str_at(&[keys::DOT11, keys::LAST_BEACONED_SSID]),
            Some("Home")
        );
        assert!(t.get(&[keys::DOT11, keys::PROBED_SSID_MAP]).is_none());
        assert!(t.get(&["missing", "deeper", "still"]).is_none());
    }

    #[test]
    fn lookup_through_non_object_is_absent() {
        let t = tree(json!({ "dot11.device": 0 }));
        assert!(t.get(&[keys::DOT11, keys::CLIENT_MAP]).is_none());
    }

    #[test]
    fn null_and_empty_count_as_absent() {
        let t = tree(json!({ "a": null, "b": "" }));
        assert!(t.get(&["a"]).is_none());
        assert!(t.get(&["b"]).is_some());
        assert!(t.str_at(&["b"]).is_none());
    }

    #[test]
    fn entries_accepts_arrays_and_maps() {
        let arr = json!([1, 2, 3]);
        let map = json!({ "x": 1, "y": 2 });
        assert_eq!(entries(Some(&arr)).len(), 3);
        assert_eq!(entries(Some(&map)).len(), 2);
        assert!(entries(Some(&json!(7))).is_empty());
        assert!(entries(None).is_empty());
    }
}
