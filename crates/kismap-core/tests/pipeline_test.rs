#![allow(clippy::unwrap_used, clippy::float_cmp)]
// End-to-end: SQLite capture file → CaptureStore → Pipeline → renderers.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rusqlite::{Connection, params};
use serde_json::{Value, json};
use tempfile::TempDir;

use kismap_core::render::{self, KmlOptions, MarkerDocument, MarkerGroup};
use kismap_core::{
    CoreError, DeviceKey, MacAddress, Pipeline, PipelineOptions, RecordSet, RowPolicy, RunStats,
};
use kismap_store::CaptureStore;

// ── Fixtures ────────────────────────────────────────────────────────

const DEVICES_DDL: &str = "CREATE TABLE devices (
    first_time INT, last_time INT, devkey TEXT, phyname TEXT, devmac TEXT,
    strongest_signal INT, min_lat REAL, min_lon REAL, max_lat REAL, max_lon REAL,
    avg_lat REAL, avg_lon REAL, bytes_data INT, type TEXT, device BLOB
)";

struct Capture {
    _dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

impl Capture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drive.kismet");
        let conn = Connection::open(&path).unwrap();
        conn.execute(DEVICES_DDL, []).unwrap();
        Self {
            _dir: dir,
            path,
            conn,
        }
    }

    fn insert(&self, mac: &str, device_type: &str, device: &[u8]) {
        self.conn
            .execute(
                "INSERT INTO devices VALUES (1500000000, 1500000060, NULL, 'IEEE802.11', ?1,
                 -50, 0, 0, 0, 0, 0, 0, 0, ?2, ?3)",
                params![mac, device_type, device],
            )
            .unwrap();
    }

    fn insert_json(&self, mac: &str, device_type: &str, device: &Value) {
        self.insert(mac, device_type, device.to_string().as_bytes());
    }

    fn run(&self, options: PipelineOptions) -> Result<(RecordSet, RunStats), CoreError> {
        let rows = CaptureStore::open(&self.path)?.read_devices()?;
        let output = Pipeline::new(options).run(rows)?;
        Ok((output.records, output.stats))
    }
}

fn fix(lon: f64, lat: f64, signal: i64) -> Value {
    json!({
        "kismet.historic.location.geopoint": [lon, lat],
        "kismet.historic.location.signal": signal,
        "kismet.historic.location.time_sec": 1_500_000_030,
    })
}

fn home_ap() -> Value {
    json!({
        "kismet.device.base.key": "K_AP",
        "kismet.device.base.macaddr": "00:11:22:33:44:55",
        "kismet.device.base.commonname": "HomeRouter",
        "kismet.device.base.channel": "6",
        "kismet.device.base.location_cloud": [fix(-75.70, 45.42, -60), fix(-75.71, 45.43, -40)],
        "dot11.device": {
            "dot11.device.last_beaconed_ssid_record": {
                "dot11.advertisedssid.ssid": "Home"
            },
            "dot11.device.associated_client_map": {
                "AA:BB:CC:DD:EE:FF": "K1"
            }
        }
    })
}

fn laptop() -> Value {
    json!({
        "kismet.device.base.key": "K1",
        "kismet.device.base.commonname": "laptop",
        "kismet.device.base.location_cloud": [fix(-75.69, 45.41, -55)],
        "dot11.device": {
            "dot11.device.client_map": {
                "00:11:22:33:44:55": {
                    "dot11.client.bssid": "00:11:22:33:44:55",
                    "dot11.client.bssid_key": "K_AP"
                }
            },
            "dot11.device.probed_ssid_map": [
                { "dot11.probedssid.ssid": "CoffeeShop" },
                { "dot11.probedssid.ssid": "" }
            ]
        }
    })
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn ap_and_client_cross_link() {
    let capture = Capture::new();
    capture.insert_json("00:11:22:33:44:55", "Wi-Fi AP", &home_ap());
    capture.insert_json("AA:BB:CC:DD:EE:FF", "Wi-Fi Client", &laptop());

    let (records, stats) = capture.run(PipelineOptions::default()).unwrap();

    assert_eq!(records.aps.len(), 1);
    assert_eq!(records.clients.len(), 1);
    assert_eq!(stats.rows_read, 2);
    assert_eq!(stats.skipped, 0);
    assert_eq!((stats.links_resolved, stats.links_total), (1, 1));

    let ap = &records.aps[0];
    assert_eq!(ap.ssid, "Home");
    assert_eq!(ap.common.name, "HomeRouter");
    assert_eq!(ap.common.first_seen, "2017-07-14 02:40:00");
    assert_eq!(ap.clients.len(), 1);
    assert_eq!(ap.clients[0].key, DeviceKey::from("K1"));
    assert_eq!(ap.clients[0].mac, MacAddress::new("AA:BB:CC:DD:EE:FF"));
    // Strongest signal wins.
    assert_eq!((ap.location.latitude, ap.location.longitude), (45.43, -75.71));
    assert_eq!(ap.location.history.len(), 2);

    let client = &records.clients[0];
    assert_eq!(client.aps.len(), 1);
    assert_eq!(client.aps[0].key, DeviceKey::from("K_AP"));
    assert_eq!(client.aps[0].ssid.as_deref(), Some("Home"));
}

#[test]
fn bare_client_with_associated_ap() {
    let capture = Capture::new();
    capture.insert_json(
        "00:11:22:33:44:55",
        "Wi-Fi AP",
        &json!({
            "kismet.device.base.key": "K_AP",
            "dot11.device": {
                "dot11.device.last_beaconed_ssid": "Home",
                "dot11.device.associated_client_map": { "aa:bb:cc:dd:ee:ff": "K1" }
            }
        }),
    );
    capture.insert_json(
        "AA:BB:CC:DD:EE:FF",
        "Wi-Fi Client",
        &json!({ "kismet.device.base.key": "K1" }),
    );

    let (records, _) = capture.run(PipelineOptions::default()).unwrap();

    let ap = &records.aps[0];
    assert_eq!(ap.ssid, "Home");
    assert_eq!(ap.clients.len(), 1);
    assert_eq!(ap.clients[0].key, DeviceKey::from("K1"));
    assert_eq!(ap.clients[0].mac, MacAddress::new("AA:BB:CC:DD:EE:FF"));

    let client = &records.clients[0];
    assert!(client.probes.is_empty());
    assert!(client.aps.is_empty());

    let doc: Value = serde_json::from_str(&render::to_json_string(&records).unwrap()).unwrap();
    assert_eq!(doc["aps"].as_array().unwrap().len(), 1);
    assert_eq!(doc["clients"].as_array().unwrap().len(), 1);
    assert_eq!(doc["probes"], json!([]));
    assert_eq!(doc["clients"][0]["Probes"], json!([]));
    assert_eq!(doc["clients"][0]["APs"], json!([]));
}

#[test]
fn peak_location_places_devices_without_history() {
    let capture = Capture::new();
    capture.insert_json(
        "AA:BB:CC:DD:EE:FF",
        "Wi-Fi Client",
        &json!({
            "kismet.device.base.key": "K1",
            "kismet.device.base.signal": {
                "kismet.common.signal.peak_loc": {
                    "kismet.common.location.geopoint": [-75.7, 45.4],
                    "kismet.common.location.fix": 3
                }
            }
        }),
    );

    let (records, _) = capture.run(PipelineOptions::default()).unwrap();
    let location = &records.clients[0].location;
    assert!(location.has_fix());
    assert_eq!((location.latitude, location.longitude), (45.4, -75.7));

    let doc = MarkerDocument::from_records(&records);
    assert_eq!(doc.placemark_count(), 1);
    let json: Value = serde_json::from_str(&render::to_json_string(&records).unwrap()).unwrap();
    assert_eq!(json["clients"][0]["FixMode"], json!(3));
}

#[test]
fn probes_drop_empty_names() {
    let capture = Capture::new();
    capture.insert_json("AA:BB:CC:DD:EE:FF", "Wi-Fi Client", &laptop());

    let (records, _) = capture.run(PipelineOptions::default()).unwrap();

    let probes: Vec<&str> = records.clients[0].probes.iter().map(|p| p.ssid.as_str()).collect();
    assert_eq!(probes, ["CoffeeShop"]);
    assert_eq!(records.probes.iter().collect::<Vec<_>>(), ["CoffeeShop"]);
    // The AP is absent, so the link stays unresolved.
    assert_eq!(records.clients[0].aps[0].ssid, None);
}

#[test]
fn bad_rows_are_skipped_or_abort() {
    let capture = Capture::new();
    capture.insert_json("AA:BB:CC:DD:EE:FF", "Wi-Fi Client", &laptop());
    capture.insert("DE:AD:BE:EF:00:00", "Wi-Fi Client", b"{ not json");

    let (records, stats) = capture.run(PipelineOptions::default()).unwrap();
    assert_eq!(records.clients.len(), 1);
    assert_eq!(stats.skipped, 1);

    let strict = PipelineOptions {
        row_policy: RowPolicy::Abort,
        ..PipelineOptions::default()
    };
    let err = capture.run(strict).unwrap_err();
    assert!(err.is_row_local(), "unexpected error: {err}");
}

#[test]
fn empty_capture_yields_empty_set() {
    let capture = Capture::new();
    let (records, stats) = capture.run(PipelineOptions::default()).unwrap();
    assert!(records.is_empty());
    assert_eq!(stats, RunStats::default());
}

// ── Rendering ───────────────────────────────────────────────────────

#[test]
fn renders_kml_and_json() {
    let capture = Capture::new();
    capture.insert_json("00:11:22:33:44:55", "Wi-Fi AP", &home_ap());
    capture.insert_json("AA:BB:CC:DD:EE:FF", "Wi-Fi Client", &laptop());
    capture.insert_json(
        "12:34:56:78:9A:BC",
        "Wi-Fi Bridged",
        &json!({ "kismet.device.base.key": "K_BR" }),
    );
    let (records, _) = capture.run(PipelineOptions::default()).unwrap();

    let doc = MarkerDocument::from_records(&records);
    assert_eq!(doc.folder(MarkerGroup::Aps).len(), 1);
    assert_eq!(doc.folder(MarkerGroup::Clients).len(), 1);
    // No fix, no placemark.
    assert!(doc.folder(MarkerGroup::Bridged).is_empty());

    let out = TempDir::new().unwrap();
    let kml_path = out.path().join("drive.kml");
    render::write_kml_file(&doc, &KmlOptions::default(), &kml_path).unwrap();
    let kml = std::fs::read_to_string(&kml_path).unwrap();
    assert!(kml.contains("<name>HomeRouter</name>"));
    assert!(kml.contains("<coordinates>-75.71,45.43</coordinates>"));
    assert!(kml.contains("<Data name=\"AP 0 SSID\">"));
    assert!(kml.contains("<value>Home</value>"));

    let json_path = out.path().join("drive.json");
    render::write_json_file(&records, &json_path).unwrap();
    let parsed = render::from_json_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.clients.len(), 1);
    assert_eq!(parsed.aps.len(), 1);
    assert_eq!(parsed.bridged.len(), 1);
    assert_eq!(parsed.other.len(), 0);
    assert_eq!(parsed, records);
}

#[test]
fn write_to_missing_directory_fails() {
    let out = TempDir::new().unwrap();
    let path = out.path().join("missing").join("drive.kml");
    let doc = MarkerDocument::from_records(&RecordSet::default());
    let err = render::write_kml_file(&doc, &KmlOptions::default(), &path).unwrap_err();
    assert!(matches!(err, CoreError::Write { .. }));
}
