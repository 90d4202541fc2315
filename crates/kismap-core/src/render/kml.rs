// KML sink
//
// Serializes a `MarkerDocument` to KML 2.2. All element text and attribute
// values go through quick-xml's escaping, so capture-supplied names (SSIDs
// in particular) can contain any character.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::info;

use super::placemark::{MarkerDocument, MarkerStyle, Placemark};
use crate::error::CoreError;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

pub const DEFAULT_ICON_HREF: &str =
    "http://maps.google.com/mapfiles/kml/shapes/placemark_circle.png";
pub const DEFAULT_DOCUMENT_NAME: &str = "Kismet capture";

/// Presentation settings for the KML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmlOptions {
    pub document_name: String,
    pub icon_href: String,
}

impl Default for KmlOptions {
    fn default() -> Self {
        Self {
            document_name: DEFAULT_DOCUMENT_NAME.into(),
            icon_href: DEFAULT_ICON_HREF.into(),
        }
    }
}

/// Write `doc` as KML to `out`.
pub fn write_kml<W: Write>(
    doc: &MarkerDocument,
    options: &KmlOptions,
    out: W,
) -> Result<(), CoreError> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;
    text_element(&mut writer, "name", &options.document_name)?;

    for style in MarkerStyle::iter() {
        write_style(&mut writer, style, &options.icon_href)?;
    }

    for folder in doc.folders() {
        writer.write_event(Event::Start(BytesStart::new("Folder")))?;
        text_element(&mut writer, "name", &folder.group.to_string())?;
        for placemark in &folder.placemarks {
            write_placemark(&mut writer, placemark)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Folder")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;

    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Render `doc` to a KML string.
pub fn to_kml_string(doc: &MarkerDocument, options: &KmlOptions) -> Result<String, CoreError> {
    let mut buf = Vec::new();
    write_kml(doc, options, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `doc` to `path`, replacing any existing file.
pub fn write_kml_file(
    doc: &MarkerDocument,
    options: &KmlOptions,
    path: &Path,
) -> Result<(), CoreError> {
    let file = File::create(path).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_kml(doc, options, BufWriter::new(file)).map_err(|err| match err {
        CoreError::Io(source) => CoreError::Write {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(path = %path.display(), placemarks = doc.placemark_count(), "wrote KML");
    Ok(())
}

// ── Elements ─────────────────────────────────────────────────────────

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), CoreError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_style<W: Write>(
    writer: &mut Writer<W>,
    style: MarkerStyle,
    icon_href: &str,
) -> Result<(), CoreError> {
    writer.write_event(Event::Start(
        BytesStart::new("Style").with_attributes([("id", style.id())]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("IconStyle")))?;
    text_element(writer, "color", style.color())?;
    text_element(writer, "scale", "1.0")?;
    writer.write_event(Event::Start(BytesStart::new("Icon")))?;
    text_element(writer, "href", icon_href)?;
    writer.write_event(Event::End(BytesEnd::new("Icon")))?;
    writer.write_event(Event::End(BytesEnd::new("IconStyle")))?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;
    Ok(())
}

fn write_placemark<W: Write>(
    writer: &mut Writer<W>,
    placemark: &Placemark,
) -> Result<(), CoreError> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;
    text_element(writer, "name", &placemark.name)?;
    text_element(writer, "styleUrl", &format!("#{}", placemark.style.id()))?;

    writer.write_event(Event::Start(BytesStart::new("ExtendedData")))?;
    for attr in &placemark.attributes {
        writer.write_event(Event::Start(
            BytesStart::new("Data").with_attributes([("name", attr.name.as_str())]),
        ))?;
        text_element(writer, "value", &attr.value)?;
        writer.write_event(Event::End(BytesEnd::new("Data")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ExtendedData")))?;

    writer.write_event(Event::Start(BytesStart::new("Point")))?;
    text_element(
        writer,
        "coordinates",
        &format!("{},{}", placemark.longitude, placemark.latitude),
    )?;
    writer.write_event(Event::End(BytesEnd::new("Point")))?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}
