// ── Export renderers ──
//
// Two independent consumers of a finished `RecordSet`: the placemark
// renderer (with its KML sink) and the JSON serializer.

pub mod json;
pub mod kml;
pub mod placemark;

pub use json::{from_json_str, to_json_string, write_json_file};
pub use kml::{KmlOptions, to_kml_string, write_kml, write_kml_file};
pub use placemark::{Attribute, Folder, MarkerDocument, MarkerGroup, MarkerStyle, Placemark};
