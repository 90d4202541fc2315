// ── Field extractors ──
//
// Pure functions from a raw row + decoded tree to typed field groups. An
// absent namespace yields an empty/default group; a malformed entry inside
// a present namespace is skipped and the rest are kept. Only the mandatory
// common fields can fail a row.

use serde_json::Value;
use tracing::trace;

use kismap_store::RawDeviceRow;

use crate::error::CoreError;
use crate::link::ClientIndex;
use crate::model::{
    ApLink, ClientLink, CommonFields, DeviceKey, Fix, LocationFields, MIN_FIX_MODE, MacAddress,
    Probe,
};
use crate::time::TimeStyle;
use crate::tree::{self, DeviceTree, keys};

/// Human label for a row in diagnostics, before its key is known.
pub(crate) fn row_label(row: &RawDeviceRow) -> String {
    row.devmac
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("<unknown>")
        .to_owned()
}

// ── Common ──────────────────────────────────────────────────────────

/// Extract the fields every device carries.
///
/// Type and MAC prefer the row columns and fall back to the tree; the key
/// only lives in the tree. Any of the three missing fails the row.
pub fn extract_common(
    row: &RawDeviceRow,
    tree: &DeviceTree,
    time: TimeStyle,
) -> Result<CommonFields, CoreError> {
    let missing = |field| CoreError::MissingField {
        device: row_label(row),
        field,
    };

    let key = tree
        .str_at(&[keys::BASE_KEY])
        .map(DeviceKey::from)
        .ok_or_else(|| missing(keys::BASE_KEY))?;

    let mac = row
        .devmac
        .as_deref()
        .map(MacAddress::new)
        .filter(|m| !m.is_empty())
        .or_else(|| tree.str_at(&[keys::BASE_MACADDR]).map(MacAddress::new))
        .filter(|m| !m.is_empty())
        .ok_or_else(|| missing("devmac"))?;

    let device_type = row
        .device_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| tree.str_at(&[keys::BASE_TYPE]))
        .map(str::to_owned)
        .ok_or_else(|| missing("type"))?;

    let name = tree
        .str_at(&[keys::BASE_COMMONNAME])
        .or_else(|| tree.str_at(&[keys::BASE_NAME]))
        .map_or_else(|| mac.to_string(), str::to_owned);

    let channel = match tree.get(&[keys::BASE_CHANNEL]) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Ok(CommonFields {
        device_type,
        first_seen: time.format(row.first_time),
        last_seen: time.format(row.last_time),
        mac,
        name,
        channel,
        key,
    })
}

// ── Location ────────────────────────────────────────────────────────

/// Collect the location history and pick the strongest-signal fix.
///
/// Ties keep the first sample encountered. Without a usable history the
/// capture tool's peak-signal location is used, provided its fix mode is
/// better than [`MIN_FIX_MODE`]. The peak fix mode is recorded whenever
/// present. Nothing usable yields the (0, 0) sentinel.
pub fn extract_location(tree: &DeviceTree, time: TimeStyle) -> LocationFields {
    let history = location_history(tree, time);
    let fix_mode = tree.i64_at(&[keys::BASE_SIGNAL, keys::PEAK_LOC, keys::LOCATION_FIX]);

    let best = history
        .iter()
        .fold(None::<&Fix>, |best, fix| match best {
            Some(b) if fix.signal <= b.signal => Some(b),
            _ => Some(fix),
        })
        .map(|b| (b.longitude, b.latitude))
        .or_else(|| {
            fix_mode
                .filter(|mode| *mode > MIN_FIX_MODE)
                .and_then(|_| {
                    tree.get(&[keys::BASE_SIGNAL, keys::PEAK_LOC, keys::LOCATION_GEOPOINT])
                })
                .and_then(geopoint)
        });

    match best {
        Some((longitude, latitude)) => LocationFields {
            latitude,
            longitude,
            history,
            fix_mode,
        },
        None => LocationFields {
            fix_mode,
            ..LocationFields::unfixed()
        },
    }
}

fn location_history(tree: &DeviceTree, time: TimeStyle) -> Vec<Fix> {
    let samples = match tree.get(&[keys::LOCATION_CLOUD]) {
        Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
        Some(cloud) => match tree::lookup(cloud, &[keys::RRD_SAMPLES]) {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => return Vec::new(),
        },
        None => return Vec::new(),
    };

    samples
        .into_iter()
        .filter_map(|sample| {
            let fix = parse_fix(sample, time);
            if fix.is_none() {
                trace!(?sample, "skipping malformed location sample");
            }
            fix
        })
        .collect()
}

/// `(lon, lat)` from a geopoint stored as `[lon, lat]` or `[lon, lat, alt]`.
fn geopoint(value: &Value) -> Option<(f64, f64)> {
    let point = value.as_array()?;
    Some((point.first()?.as_f64()?, point.get(1)?.as_f64()?))
}

fn parse_fix(sample: &Value, time: TimeStyle) -> Option<Fix> {
    let (longitude, latitude) = geopoint(tree::lookup(sample, &[keys::HISTORIC_GEOPOINT])?)?;
    let signal = signal_value(tree::lookup(sample, &[keys::HISTORIC_SIGNAL])?)?;
    let time = tree::lookup(sample, &[keys::HISTORIC_TIME])
        .and_then(Value::as_i64)
        .map(|secs| time.format(secs));

    Some(Fix {
        latitude,
        longitude,
        signal,
        time,
    })
}

#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
fn signal_value(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
}

// ── Associations ────────────────────────────────────────────────────

/// APs this device was seen associated with, in capture order.
///
/// Entries without an AP key are skipped; a missing BSSID falls back to
/// the map key, which the capture tool sets to the BSSID.
pub fn extract_client_aps(tree: &DeviceTree) -> Vec<ApLink> {
    let Some(Value::Object(map)) = tree.get(&[keys::DOT11, keys::CLIENT_MAP]) else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(map_key, entry)| {
            let key = tree::lookup(entry, &[keys::CLIENT_BSSID_KEY])
                .and_then(Value::as_str)
                .filter(|k| !k.is_empty())?;
            let bssid = tree::lookup(entry, &[keys::CLIENT_BSSID])
                .and_then(Value::as_str)
                .filter(|b| !b.is_empty())
                .unwrap_or(map_key.as_str());
            Some(ApLink {
                key: DeviceKey::from(key),
                bssid: MacAddress::new(bssid),
                ssid: None,
            })
        })
        .collect()
}

/// Clients an AP recorded as associated, resolved against the client
/// partition.
///
/// The association map is client MAC ⇒ client key. A key found in
/// `clients` takes that client's own MAC; otherwise the map key stands in.
pub fn extract_ap_clients(tree: &DeviceTree, clients: &ClientIndex<'_>) -> Vec<ClientLink> {
    let Some(Value::Object(map)) = tree.get(&[keys::DOT11, keys::ASSOCIATED_CLIENT_MAP]) else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(map_key, value)| {
            let key = DeviceKey::from(value.as_str().filter(|k| !k.is_empty())?);
            let mac = clients
                .mac_for(&key)
                .cloned()
                .unwrap_or_else(|| MacAddress::new(map_key));
            Some(ClientLink { key, mac })
        })
        .collect()
}

// ── Networks ────────────────────────────────────────────────────────

/// Network names this device probed for. Empty names are dropped.
pub fn extract_probes(tree: &DeviceTree) -> Vec<Probe> {
    tree::entries(tree.get(&[keys::DOT11, keys::PROBED_SSID_MAP]))
        .into_iter()
        .filter_map(|entry| {
            tree::lookup(entry, &[keys::PROBED_SSID])
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(|ssid| Probe {
                    ssid: ssid.to_owned(),
                })
        })
        .collect()
}

/// The most recently advertised network name of an AP, `""` when unknown.
pub fn extract_ssid(tree: &DeviceTree) -> String {
    tree.str_at(&[
        keys::DOT11,
        keys::LAST_BEACONED_SSID_RECORD,
        keys::ADVERTISED_SSID,
    ])
    .or_else(|| tree.str_at(&[keys::DOT11, keys::LAST_BEACONED_SSID]))
    .unwrap_or_default()
    .to_owned()
}
