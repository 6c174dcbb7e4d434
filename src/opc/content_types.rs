//! Content Types handling for OPC packages
//!
//! Parses and generates `[Content_Types].xml`

use crate::error::{Error, Result};
use crate::opc::PartUri;
use crate::xml::{writer::StartExt, Ns, PartReader};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::collections::BTreeMap;
use std::io::Write;

/// Content types definition for an OPC package
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// Default extension mappings (lower-case extension -> content type)
    defaults: BTreeMap<String, String>,
    /// Override mappings (part URI -> content type)
    overrides: BTreeMap<PartUri, String>,
}

impl ContentTypes {
    /// Create a new ContentTypes with standard defaults
    pub fn new() -> Self {
        let mut ct = Self::default();

        ct.add_default("rels", RELATIONSHIPS);
        ct.add_default("xml", XML);

        for (ext, mime) in IMAGE_TYPES {
            ct.add_default(ext, mime);
        }

        ct
    }

    /// Parse `[Content_Types].xml`
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut reader = PartReader::from_bytes("/[Content_Types].xml", xml, false);
        let mut ct = Self::default();

        reader.read_root((Ns::Ct, b"Types"), |r, root| {
            r.children(root, |r, child| {
                let required = |name: &str| {
                    child.string(Ns::None, name).ok_or_else(|| Error::MissingAttribute {
                        element: child.name(),
                        attr: name.into(),
                    })
                };
                match (child.ns, child.local()) {
                    (Ns::Ct, b"Default") => {
                        let ext = required("Extension")?;
                        ct.add_default(&ext, &required("ContentType")?);
                    }
                    (Ns::Ct, b"Override") => {
                        let uri = PartUri::new(&required("PartName")?)?;
                        ct.add_override(&uri, &required("ContentType")?);
                    }
                    _ => return Ok(false),
                }
                r.skip(child)?;
                Ok(true)
            })
        })?;

        Ok(ct)
    }

    /// Serialize to bytes
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Write to a writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut xml = Writer::new(writer);
        crate::xml::writer::write_decl(&mut xml)?;

        let mut types = BytesStart::new("Types");
        types.push_attribute(("xmlns", crate::xml::CT));
        xml.write_event(Event::Start(types))?;

        for (ext, content_type) in &self.defaults {
            let mut default = BytesStart::new("Default");
            default.attr("Extension", ext).attr("ContentType", content_type);
            xml.write_event(Event::Empty(default))?;
        }

        for (uri, content_type) in &self.overrides {
            let mut override_elem = BytesStart::new("Override");
            override_elem
                .attr("PartName", uri)
                .attr("ContentType", content_type);
            xml.write_event(Event::Empty(override_elem))?;
        }

        xml.write_event(Event::End(BytesEnd::new("Types")))?;
        Ok(())
    }

    /// Add a default extension mapping
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_lowercase(), content_type.to_string());
    }

    /// Whether an extension has a default mapping
    pub fn has_default(&self, extension: &str) -> bool {
        self.defaults.contains_key(&extension.to_lowercase())
    }

    /// Add an override for a specific part
    pub fn add_override(&mut self, uri: &PartUri, content_type: &str) {
        self.overrides.insert(uri.clone(), content_type.to_string());
    }

    /// Get the content type for a part: override first, then extension
    pub fn get(&self, uri: &PartUri) -> Option<&str> {
        if let Some(ct) = self.overrides.get(uri) {
            return Some(ct);
        }

        uri.extension()
            .and_then(|ext| self.defaults.get(&ext.to_lowercase()))
            .map(|s| s.as_str())
    }

    /// Content type lookup with the load policy applied.
    ///
    /// Strict mode fails with `UnknownContentType`; lenient mode falls
    /// back to `application/xml`.
    pub fn resolve(&self, uri: &PartUri, strict: bool) -> Result<String> {
        match self.get(uri) {
            Some(ct) => Ok(ct.to_string()),
            None if strict => Err(Error::UnknownContentType {
                part: uri.to_string(),
            }),
            None => {
                log::debug!("no content type for {}, assuming {}", uri, XML);
                Ok(XML.to_string())
            }
        }
    }

    /// Remove an override
    pub fn remove_override(&mut self, uri: &PartUri) -> Option<String> {
        self.overrides.remove(uri)
    }
}

/// Image MIME types by extension
pub const IMAGE_TYPES: [(&str, &str); 7] = [
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
    ("emf", "image/x-emf"),
];

/// MIME type for an image extension
pub fn image_content_type(ext: &str) -> Option<&'static str> {
    let ext = ext.to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

// Well-known content types
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const XML: &str = "application/xml";
pub const MAIN_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub const NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
pub const HEADER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub const FOOTER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="XML" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    #[test]
    fn test_override_wins_over_default() {
        let ct = ContentTypes::from_xml(TYPES.as_bytes()).unwrap();

        let doc = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(ct.get(&doc), Some(MAIN_DOCUMENT));

        let other = PartUri::new("/word/settings.xml").unwrap();
        assert_eq!(ct.get(&other), Some(XML));
    }

    #[test]
    fn test_parse_non_empty_entries() {
        let xml = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"></Default>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"></Override>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;
        let ct = ContentTypes::from_xml(xml.as_bytes()).unwrap();

        let doc = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(ct.get(&doc), Some(MAIN_DOCUMENT));
        let styles = PartUri::new("/word/styles.xml").unwrap();
        assert_eq!(ct.get(&styles), Some(STYLES));
    }

    #[test]
    fn test_resolve_strict_and_lenient() {
        let ct = ContentTypes::from_xml(TYPES.as_bytes()).unwrap();
        let unknown = PartUri::new("/word/media/image1.wdp").unwrap();

        assert_eq!(ct.resolve(&unknown, false).unwrap(), XML);
        match ct.resolve(&unknown, true) {
            Err(Error::UnknownContentType { part }) => assert_eq!(part, "/word/media/image1.wdp"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_roundtrip() {
        let mut ct = ContentTypes::new();
        ct.add_override(&PartUri::new("/word/header1.xml").unwrap(), HEADER);

        let ct2 = ContentTypes::from_xml(&ct.to_xml().unwrap()).unwrap();
        assert_eq!(ct2, ct);
    }

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type("PNG"), Some("image/png"));
        assert_eq!(image_content_type("svg"), None);
    }
}
