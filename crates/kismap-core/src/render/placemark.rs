// ── Placemark rendering ──
//
// Turns a finished `RecordSet` into a format-neutral marker document:
// four folders of styled placemarks, each with an ordered attribute list.
// The KML sink serializes it; tests inspect it directly.

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::model::{ApRecord, CommonFields, LocationFields, StationRecord};
use crate::pipeline::RecordSet;

/// Destination folder for a placemark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum MarkerGroup {
    Clients,
    #[strum(serialize = "APs")]
    Aps,
    Bridged,
    Other,
}

/// Circular marker colors, one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
pub enum MarkerStyle {
    /// Clients, and any device with AP associations.
    Blue,
    /// Access points.
    Green,
    /// Bridged devices without associations.
    Amber,
    /// Unclassified devices without associations.
    Red,
}

impl MarkerStyle {
    pub fn id(self) -> &'static str {
        match self {
            Self::Blue => "blue_circle",
            Self::Green => "green_circle",
            Self::Amber => "amber_circle",
            Self::Red => "red_circle",
        }
    }

    /// KML `aabbggrr` color.
    pub fn color(self) -> &'static str {
        match self {
            Self::Blue => "ffff0000",
            Self::Green => "ff00ff00",
            Self::Amber => "ff00c2ff",
            Self::Red => "ff0000ff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placemark {
    pub name: String,
    pub style: MarkerStyle,
    pub longitude: f64,
    pub latitude: f64,
    pub attributes: Vec<Attribute>,
}

impl Placemark {
    /// First value of the attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Every value of the attribute called `name`, in order.
    pub fn attributes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.name == name)
            .map(|a| a.value.as_str())
    }

    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub group: MarkerGroup,
    pub placemarks: Vec<Placemark>,
}

/// Four folders in fixed order: Clients, APs, Bridged, Other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDocument {
    folders: Vec<Folder>,
}

impl MarkerDocument {
    /// Place every record that has a real fix. Records without one are left
    /// out rather than drawn at the (0, 0) sentinel.
    pub fn from_records(records: &RecordSet) -> Self {
        let mut doc = Self {
            folders: MarkerGroup::iter()
                .map(|group| Folder {
                    group,
                    placemarks: Vec::new(),
                })
                .collect(),
        };

        for client in records.clients.iter().filter(|r| r.location.has_fix()) {
            doc.place(MarkerGroup::Clients, station_placemark(client, MarkerStyle::Blue));
        }
        for ap in records.aps.iter().filter(|r| r.location.has_fix()) {
            doc.place(MarkerGroup::Aps, ap_placemark(ap));
        }
        for device in records.other.iter().filter(|r| r.location.has_fix()) {
            let (group, style) = station_group(device, MarkerGroup::Other, MarkerStyle::Red);
            doc.place(group, station_placemark(device, style));
        }
        for device in records.bridged.iter().filter(|r| r.location.has_fix()) {
            let (group, style) = station_group(device, MarkerGroup::Bridged, MarkerStyle::Amber);
            doc.place(group, station_placemark(device, style));
        }

        doc
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, group: MarkerGroup) -> &[Placemark] {
        self.folders
            .iter()
            .find(|f| f.group == group)
            .map(|f| f.placemarks.as_slice())
            .unwrap_or_default()
    }

    pub fn placemark_count(&self) -> usize {
        self.folders.iter().map(|f| f.placemarks.len()).sum()
    }

    fn place(&mut self, group: MarkerGroup, placemark: Placemark) {
        if let Some(folder) = self.folders.iter_mut().find(|f| f.group == group) {
            folder.placemarks.push(placemark);
        }
    }
}

/// Associated devices are drawn with the clients regardless of class.
fn station_group(
    device: &StationRecord,
    own_group: MarkerGroup,
    own_style: MarkerStyle,
) -> (MarkerGroup, MarkerStyle) {
    if device.is_associated() {
        (MarkerGroup::Clients, MarkerStyle::Blue)
    } else {
        (own_group, own_style)
    }
}

fn base_placemark(
    common: &CommonFields,
    location: &LocationFields,
    style: MarkerStyle,
) -> Placemark {
    let mut pm = Placemark {
        name: common.name.clone(),
        style,
        longitude: location.longitude,
        latitude: location.latitude,
        attributes: Vec::new(),
    };
    pm.push("Device MAC", common.mac.as_str());
    pm.push("Type", common.device_type.as_str());
    pm.push("First Seen", common.first_seen.as_str());
    pm.push("Last Seen", common.last_seen.as_str());
    pm.push("Channel", common.channel.as_str());
    if let Some(mode) = location.fix_mode {
        pm.push("Fix Mode", mode.to_string());
    }
    pm
}

fn station_placemark(device: &StationRecord, style: MarkerStyle) -> Placemark {
    let mut pm = base_placemark(&device.common, &device.location, style);
    for probe in &device.probes {
        pm.push("Probed SSID", probe.ssid.as_str());
    }
    for (i, link) in device.aps.iter().enumerate() {
        if let Some(ssid) = &link.ssid {
            pm.push(format!("AP {i} SSID"), ssid.as_str());
        }
        pm.push(format!("AP {i} BSSID"), link.bssid.as_str());
    }
    pm
}

fn ap_placemark(ap: &ApRecord) -> Placemark {
    let mut pm = base_placemark(&ap.common, &ap.location, MarkerStyle::Green);
    pm.push("SSID", ap.ssid.as_str());
    for client in &ap.clients {
        pm.push("Client Device MAC", client.mac.as_str());
    }
    pm
}
