// ── Record normalization pipeline ──
//
// Four named stages, each a distinct type, so the ordering the cross-links
// depend on is enforced by the compiler:
//
//   classify ─▶ extract_stations ─▶ extract_access_points ─▶ link
//
// APs resolve their clients against the finished client partition, and
// stations resolve AP SSIDs against the finished AP partition. Records are
// not touched again once `link` returns.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use kismap_store::RawDeviceRow;

use crate::error::CoreError;
use crate::extract::{
    extract_ap_clients, extract_client_aps, extract_common, extract_location, extract_probes,
    extract_ssid, row_label,
};
use crate::link::{ApIndex, ClientIndex};
use crate::model::{ApRecord, DeviceClass, StationRecord};
use crate::time::TimeStyle;
use crate::tree::DeviceTree;

// ── Options ──────────────────────────────────────────────────────────

/// What to do with a row whose blob or mandatory fields are bad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Log the row and leave it out of every partition.
    #[default]
    Skip,
    /// Abort the run with the row's error.
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub row_policy: RowPolicy,
    pub time_style: TimeStyle,
}

// ── Results ──────────────────────────────────────────────────────────

/// Bookkeeping for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub rows_read: usize,
    pub clients: usize,
    pub aps: usize,
    pub bridged: usize,
    pub other: usize,
    pub skipped: usize,
    /// Station ⇒ AP associations whose AP was found.
    pub links_resolved: usize,
    pub links_total: usize,
}

/// The enriched, final record set both renderers consume.
///
/// Serializes to the JSON export document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub clients: Vec<StationRecord>,
    pub aps: Vec<ApRecord>,
    pub bridged: Vec<StationRecord>,
    pub other: Vec<StationRecord>,
    /// Every non-empty probed SSID across the dataset, first-seen order.
    pub probes: IndexSet<String>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.clients.len() + self.aps.len() + self.bridged.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: RecordSet,
    pub stats: RunStats,
}

// ── Pipeline ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Run every stage over `rows`.
    pub fn run(&self, rows: Vec<RawDeviceRow>) -> Result<PipelineOutput, CoreError> {
        let output = self
            .classify(rows)
            .extract_stations()?
            .extract_access_points()?
            .link();
        info!(
            clients = output.stats.clients,
            aps = output.stats.aps,
            bridged = output.stats.bridged,
            other = output.stats.other,
            skipped = output.stats.skipped,
            "pipeline complete"
        );
        Ok(output)
    }

    /// Stage 1: route each row to exactly one partition by its declared
    /// type, preserving input order within each.
    pub fn classify(&self, rows: Vec<RawDeviceRow>) -> Classified {
        let mut stage = Classified {
            options: self.options,
            stats: RunStats {
                rows_read: rows.len(),
                ..RunStats::default()
            },
            clients: Vec::new(),
            aps: Vec::new(),
            bridged: Vec::new(),
            other: Vec::new(),
        };

        for row in rows {
            match DeviceClass::classify(row.device_type.as_deref()) {
                DeviceClass::Client => stage.clients.push(row),
                DeviceClass::AccessPoint => stage.aps.push(row),
                DeviceClass::Bridged => stage.bridged.push(row),
                DeviceClass::Other => stage.other.push(row),
            }
        }

        debug!(
            clients = stage.clients.len(),
            aps = stage.aps.len(),
            bridged = stage.bridged.len(),
            other = stage.other.len(),
            "classified device rows"
        );
        stage
    }
}

// ── Stage 1 ──────────────────────────────────────────────────────────

/// Rows partitioned by class, not yet decoded.
#[derive(Debug)]
pub struct Classified {
    options: PipelineOptions,
    stats: RunStats,
    clients: Vec<RawDeviceRow>,
    aps: Vec<RawDeviceRow>,
    bridged: Vec<RawDeviceRow>,
    other: Vec<RawDeviceRow>,
}

impl Classified {
    pub fn rows(&self, class: DeviceClass) -> &[RawDeviceRow] {
        match class {
            DeviceClass::Client => &self.clients,
            DeviceClass::AccessPoint => &self.aps,
            DeviceClass::Bridged => &self.bridged,
            DeviceClass::Other => &self.other,
        }
    }

    /// Stage 2: decode and extract clients, bridged and other devices.
    pub fn extract_stations(self) -> Result<StationsReady, CoreError> {
        let Self {
            options,
            mut stats,
            clients,
            aps,
            bridged,
            other,
        } = self;

        let clients = extract_rows(clients, options, &mut stats, |row, tree| {
            extract_station(row, tree, options.time_style)
        })?;
        let bridged = extract_rows(bridged, options, &mut stats, |row, tree| {
            extract_station(row, tree, options.time_style)
        })?;
        let other = extract_rows(other, options, &mut stats, |row, tree| {
            extract_station(row, tree, options.time_style)
        })?;

        Ok(StationsReady {
            options,
            stats,
            clients,
            bridged,
            other,
            ap_rows: aps,
        })
    }
}

// ── Stage 2 ──────────────────────────────────────────────────────────

/// Stations extracted; AP rows still raw.
#[derive(Debug)]
pub struct StationsReady {
    options: PipelineOptions,
    stats: RunStats,
    clients: Vec<StationRecord>,
    bridged: Vec<StationRecord>,
    other: Vec<StationRecord>,
    ap_rows: Vec<RawDeviceRow>,
}

impl StationsReady {
    pub fn clients(&self) -> &[StationRecord] {
        &self.clients
    }

    /// Stage 3: decode and extract APs, resolving each associated client
    /// against the client partition.
    pub fn extract_access_points(self) -> Result<AccessPointsReady, CoreError> {
        let Self {
            options,
            mut stats,
            clients,
            bridged,
            other,
            ap_rows,
        } = self;

        let aps = {
            let index = ClientIndex::build(&clients);
            extract_rows(ap_rows, options, &mut stats, |row, tree| {
                Ok(ApRecord {
                    common: extract_common(row, tree, options.time_style)?,
                    location: extract_location(tree, options.time_style),
                    ssid: extract_ssid(tree),
                    clients: extract_ap_clients(tree, &index),
                })
            })?
        };

        Ok(AccessPointsReady {
            stats,
            clients,
            aps,
            bridged,
            other,
        })
    }
}

// ── Stage 3 ──────────────────────────────────────────────────────────

/// Every partition extracted; station ⇒ AP links not yet resolved.
#[derive(Debug)]
pub struct AccessPointsReady {
    stats: RunStats,
    clients: Vec<StationRecord>,
    aps: Vec<ApRecord>,
    bridged: Vec<StationRecord>,
    other: Vec<StationRecord>,
}

impl AccessPointsReady {
    pub fn aps(&self) -> &[ApRecord] {
        &self.aps
    }

    /// Stage 4: backfill AP SSIDs onto station associations and fold every
    /// station's probes into the dataset-wide probe set.
    pub fn link(self) -> PipelineOutput {
        let Self {
            mut stats,
            mut clients,
            aps,
            mut bridged,
            mut other,
        } = self;

        let index = ApIndex::build(&aps);
        stats.links_resolved = index.backfill(&mut clients)
            + index.backfill(&mut bridged)
            + index.backfill(&mut other);
        stats.links_total = [&clients, &bridged, &other]
            .iter()
            .flat_map(|partition| partition.iter())
            .map(|s| s.aps.len())
            .sum();

        let probes: IndexSet<String> = [&clients, &bridged, &other]
            .iter()
            .flat_map(|partition| partition.iter())
            .flat_map(|s| s.probes.iter())
            .map(|p| p.ssid.clone())
            .collect();

        stats.clients = clients.len();
        stats.aps = aps.len();
        stats.bridged = bridged.len();
        stats.other = other.len();
        debug!(
            resolved = stats.links_resolved,
            total = stats.links_total,
            probes = probes.len(),
            "linked partitions"
        );

        PipelineOutput {
            records: RecordSet {
                clients,
                aps,
                bridged,
                other,
                probes,
            },
            stats,
        }
    }
}

// ── Row handling ─────────────────────────────────────────────────────

fn extract_station(
    row: &RawDeviceRow,
    tree: &DeviceTree,
    time: TimeStyle,
) -> Result<StationRecord, CoreError> {
    Ok(StationRecord {
        common: extract_common(row, tree, time)?,
        location: extract_location(tree, time),
        aps: extract_client_aps(tree),
        probes: extract_probes(tree),
    })
}

/// Decode and extract a partition. Each decoded tree lives only for the
/// call that consumes it.
fn extract_rows<T>(
    rows: Vec<RawDeviceRow>,
    options: PipelineOptions,
    stats: &mut RunStats,
    extract: impl Fn(&RawDeviceRow, &DeviceTree) -> Result<T, CoreError>,
) -> Result<Vec<T>, CoreError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let result = DeviceTree::decode(&row.device)
            .map_err(|source| CoreError::Decode {
                device: row_label(&row),
                source,
            })
            .and_then(|tree| extract(&row, &tree));

        match result {
            Ok(record) => out.push(record),
            Err(err) if err.is_row_local() && options.row_policy == RowPolicy::Skip => {
                warn!(error = %err, "skipping device row");
                stats.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kismap_store::GeoSummary;
    use serde_json::{Value, json};

    fn raw(device_type: Option<&str>, mac: &str, device: &Value) -> RawDeviceRow {
        RawDeviceRow {
            first_time: 1,
            last_time: 2,
            phyname: Some("IEEE802.11".into()),
            devmac: Some(mac.into()),
            strongest_signal: None,
            geo: GeoSummary::default(),
            bytes_data: None,
            device_type: device_type.map(str::to_owned),
            device: serde_json::to_vec(device).unwrap(),
        }
    }

    fn keyed(key: &str) -> Value {
        json!({ "kismet.device.base.key": key })
    }

    #[test]
    fn classify_is_total_and_disjoint() {
        let rows = vec![
            raw(Some("Wi-Fi Client"), "01", &keyed("a")),
            raw(Some("Wi-Fi AP"), "02", &keyed("b")),
            raw(Some("Wi-Fi Bridged"), "03", &keyed("c")),
            raw(Some("Wi-Fi Device"), "04", &keyed("d")),
            raw(None, "05", &keyed("e")),
            raw(Some("Wi-Fi Client"), "06", &keyed("f")),
        ];
        let stage = Pipeline::default().classify(rows);

        let macs = |class| {
            stage
                .rows(class)
                .iter()
                .map(|r| r.devmac.clone().unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(macs(DeviceClass::Client), ["01", "06"]);
        assert_eq!(macs(DeviceClass::AccessPoint), ["02"]);
        assert_eq!(macs(DeviceClass::Bridged), ["03"]);
        assert_eq!(macs(DeviceClass::Other), ["04", "05"]);
    }

    #[test]
    fn bad_rows_are_skipped_by_default() {
        let mut broken = raw(Some("Wi-Fi Client"), "01", &keyed("a"));
        broken.device = b"{not json".to_vec();
        let rows = vec![
            broken,
            raw(Some("Wi-Fi Client"), "02", &json!({})),
            raw(Some("Wi-Fi Client"), "03", &keyed("ok")),
        ];

        let output = Pipeline::default().run(rows).unwrap();
        assert_eq!(output.stats.skipped, 2);
        assert_eq!(output.records.clients.len(), 1);
        assert_eq!(output.records.clients[0].common.key.as_str(), "ok");
    }

    #[test]
    fn abort_policy_surfaces_row_error() {
        let mut broken = raw(Some("Wi-Fi AP"), "01", &keyed("a"));
        broken.device = b"[]".to_vec();
        let pipeline = Pipeline::new(PipelineOptions {
            row_policy: RowPolicy::Abort,
            ..PipelineOptions::default()
        });
        let err = pipeline.run(vec![broken]).unwrap_err();
        assert!(matches!(err, CoreError::Decode { .. }));
    }

    #[test]
    fn stages_expose_intermediate_partitions() {
        let client = raw(Some("Wi-Fi Client"), "AA:BB:CC:DD:EE:FF", &keyed("K1"));
        let ap = raw(
            Some("Wi-Fi AP"),
            "00:11:22:33:44:55",
            &json!({
                "kismet.device.base.key": "AP1",
                "dot11.device": {
                    "dot11.device.associated_client_map": { "aa:bb:cc:dd:ee:ff": "K1" }
                }
            }),
        );

        let stations = Pipeline::default()
            .classify(vec![ap, client])
            .extract_stations()
            .unwrap();
        assert_eq!(stations.clients().len(), 1);

        let aps = stations.extract_access_points().unwrap();
        assert_eq!(aps.aps()[0].clients[0].mac.as_str(), "AA:BB:CC:DD:EE:FF");

        let output = aps.link();
        assert_eq!(output.stats.rows_read, 2);
        assert_eq!(output.records.len(), 2);
    }

    #[test]
    fn probe_set_is_union_without_duplicates() {
        let probing = |key: &str, ssids: &[&str]| {
            json!({
                "kismet.device.base.key": key,
                "dot11.device": {
                    "dot11.device.probed_ssid_map": ssids
                        .iter()
                        .map(|s| json!({ "dot11.probedssid.ssid": s }))
                        .collect::<Vec<_>>()
                }
            })
        };
        let rows = vec![
            raw(Some("Wi-Fi Client"), "01", &probing("a", &["Home", "Cafe"])),
            raw(Some("Wi-Fi Device"), "02", &probing("b", &["Cafe", "", "Work"])),
            raw(Some("Wi-Fi Bridged"), "03", &probing("c", &["Home"])),
        ];

        let output = Pipeline::default().run(rows).unwrap();
        let probes: Vec<&str> = output.records.probes.iter().map(String::as_str).collect();
        assert_eq!(probes, ["Home", "Cafe", "Work"]);
    }

    #[test]
    fn link_stats_count_resolved_associations() {
        let ap = raw(
            Some("Wi-Fi AP"),
            "00:00:00:00:00:01",
            &json!({
                "kismet.device.base.key": "AP1",
                "dot11.device": {
                    "dot11.device.last_beaconed_ssid_record": { "dot11.advertisedssid.ssid": "Net" }
                }
            }),
        );
        let client = raw(
            Some("Wi-Fi Client"),
            "00:00:00:00:00:02",
            &json!({
                "kismet.device.base.key": "C1",
                "dot11.device": {
                    "dot11.device.client_map": {
                        "00:00:00:00:00:01": { "dot11.client.bssid": "00:00:00:00:00:01", "dot11.client.bssid_key": "AP1" },
                        "00:00:00:00:00:09": { "dot11.client.bssid": "00:00:00:00:00:09", "dot11.client.bssid_key": "AP9" }
                    }
                }
            }),
        );

        let output = Pipeline::default().run(vec![client, ap]).unwrap();
        assert_eq!(output.stats.links_total, 2);
        assert_eq!(output.stats.links_resolved, 1);
        let links = &output.records.clients[0].aps;
        assert_eq!(links[0].ssid.as_deref(), Some("Net"));
        assert_eq!(links[1].ssid, None);
    }
}
