// ── Device classification ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Partition a device row belongs to, decided solely by its declared type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum DeviceClass {
    #[strum(serialize = "Wi-Fi Client")]
    Client,
    #[strum(serialize = "Wi-Fi AP")]
    AccessPoint,
    #[strum(serialize = "Wi-Fi Bridged")]
    Bridged,
    Other,
}

impl DeviceClass {
    /// Route a declared type string. Matching is exact; anything
    /// unrecognized, and a NULL type, lands in [`DeviceClass::Other`].
    pub fn classify(declared: Option<&str>) -> Self {
        declared
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_types() {
        assert_eq!(DeviceClass::classify(Some("Wi-Fi Client")), DeviceClass::Client);
        assert_eq!(DeviceClass::classify(Some("Wi-Fi AP")), DeviceClass::AccessPoint);
        assert_eq!(DeviceClass::classify(Some("Wi-Fi Bridged")), DeviceClass::Bridged);
    }

    #[test]
    fn classify_falls_back_to_other() {
        assert_eq!(DeviceClass::classify(Some("Wi-Fi Device")), DeviceClass::Other);
        assert_eq!(DeviceClass::classify(Some("BTLE")), DeviceClass::Other);
        assert_eq!(DeviceClass::classify(Some("wi-fi ap")), DeviceClass::Other);
        assert_eq!(DeviceClass::classify(Some("")), DeviceClass::Other);
        assert_eq!(DeviceClass::classify(None), DeviceClass::Other);
    }

    #[test]
    fn display_matches_declared_type() {
        assert_eq!(DeviceClass::AccessPoint.to_string(), "Wi-Fi AP");
        let name: &'static str = DeviceClass::Client.into();
        assert_eq!(name, "Wi-Fi Client");
    }
}
