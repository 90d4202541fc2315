// ── Domain model ──

pub mod class;
pub mod ids;
pub mod record;

pub use class::DeviceClass;
pub use ids::{DeviceKey, MacAddress};
pub use record::{
    ApLink, ApRecord, ClientLink, CommonFields, Fix, LocationFields, MIN_FIX_MODE, Probe,
    StationRecord,
};
