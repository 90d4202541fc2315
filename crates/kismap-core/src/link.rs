// ── Cross-partition lookup indices ──
//
// Built once from a finished partition and borrowed by the stage that needs
// it. A key that appears twice in a partition resolves to its first record.
// A miss is a normal outcome and is represented by `None`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::model::{ApRecord, DeviceKey, MacAddress, StationRecord};

/// Client key ⇒ client MAC, over the finished client partition.
pub struct ClientIndex<'a> {
    by_key: HashMap<&'a str, &'a MacAddress>,
}

impl<'a> ClientIndex<'a> {
    pub fn build(clients: &'a [StationRecord]) -> Self {
        let mut by_key = HashMap::with_capacity(clients.len());
        for client in clients {
            if let Entry::Vacant(slot) = by_key.entry(client.common.key.as_str()) {
                slot.insert(&client.common.mac);
            } else {
                debug!(key = %client.common.key, "duplicate client key, keeping first");
            }
        }
        Self { by_key }
    }

    pub fn mac_for(&self, key: &DeviceKey) -> Option<&'a MacAddress> {
        self.by_key.get(key.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// AP key ⇒ advertised SSID, over the finished AP partition.
pub struct ApIndex<'a> {
    by_key: HashMap<&'a str, &'a str>,
}

impl<'a> ApIndex<'a> {
    pub fn build(aps: &'a [ApRecord]) -> Self {
        let mut by_key = HashMap::with_capacity(aps.len());
        for ap in aps {
            if let Entry::Vacant(slot) = by_key.entry(ap.common.key.as_str()) {
                slot.insert(ap.ssid.as_str());
            } else {
                debug!(key = %ap.common.key, "duplicate AP key, keeping first");
            }
        }
        Self { by_key }
    }

    pub fn ssid_for(&self, key: &DeviceKey) -> Option<&'a str> {
        self.by_key.get(key.as_str()).copied()
    }

    /// Annotate every AP association on `stations` with the AP's SSID.
    /// Returns how many associations resolved.
    pub fn backfill(&self, stations: &mut [StationRecord]) -> usize {
        let mut resolved = 0;
        for link in stations.iter_mut().flat_map(|s| s.aps.iter_mut()) {
            link.ssid = self.ssid_for(&link.key).map(str::to_owned);
            if link.ssid.is_some() {
                resolved += 1;
            }
        }
        resolved
    }
}
