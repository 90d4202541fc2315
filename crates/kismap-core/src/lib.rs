//! Record normalization and export rendering for Kismet capture databases.
//!
//! Consumes the raw `devices` rows read by `kismap-store` and produces the
//! normalized, cross-linked record set the CLI exports:
//!
//! - **[`Pipeline`]** runs the four stages (classify, extract stations,
//!   extract access points, link) and returns a [`RecordSet`] plus
//!   [`RunStats`]. Each stage is its own type, so APs always resolve clients
//!   against a finished client partition.
//!
//! - **[`DeviceTree`]** wraps the decoded per-device JSON document, with path
//!   lookups for the dotted Kismet field names in [`tree::keys`].
//!
//! - **Renderers** ([`render`]) turn a record set into a [`MarkerDocument`]
//!   serialized as KML, or into the pretty-printed JSON export.
//!
//! - **Domain model** ([`model`]) holds the per-category record types,
//!   the device class enum and the key/MAC newtypes.

pub mod error;
pub mod extract;
pub mod link;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod time;
pub mod tree;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use pipeline::{
    AccessPointsReady, Classified, Pipeline, PipelineOptions, PipelineOutput, RecordSet, RowPolicy,
    RunStats, StationsReady,
};
pub use render::{KmlOptions, MarkerDocument, MarkerGroup, MarkerStyle};
pub use time::TimeStyle;
pub use tree::{DecodeError, DeviceTree};

pub use model::{
    ApLink, ApRecord, ClientLink, CommonFields, DeviceClass, DeviceKey, Fix, LocationFields,
    MacAddress, Probe, StationRecord,
};
