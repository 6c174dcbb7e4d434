//! Relationships handling for OPC packages
//!
//! Parses and generates `.rels` files. Each set belongs to exactly one
//! owning part and allocates its own `rId{n}` identifiers.

use crate::error::{Error, Result};
use crate::xml::{writer::StartExt, Ns, PartReader};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;

/// Relationship set of one owning part
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationships {
    /// Relationships in document order
    items: Vec<Relationship>,
    /// Next auto-generated ID number
    next_id: u32,
}

impl Default for Relationships {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

/// A single relationship
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative to the owner's directory) or external URL
    pub target: String,
    /// Target mode
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }
}

/// Target mode for relationships
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetMode {
    /// Internal target (part within the package)
    #[default]
    Internal,
    /// External target (hyperlink, etc.)
    External,
}

impl Relationships {
    /// Create empty relationships
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part
    pub fn from_xml(part: &str, xml: &[u8]) -> Result<Self> {
        let mut reader = PartReader::from_bytes(part, xml, false);
        let mut rels = Self::new();

        reader.read_root((Ns::Pr, b"Relationships"), |r, root| {
            r.children(root, |r, child| {
                if (child.ns, child.local()) != (Ns::Pr, b"Relationship".as_slice()) {
                    return Ok(false);
                }
                let required = |name: &str| {
                    child.string(Ns::None, name).ok_or_else(|| Error::MissingAttribute {
                        element: "Relationship".into(),
                        attr: name.into(),
                    })
                };
                let target_mode = match child.attr(Ns::None, "TargetMode") {
                    Some("External") => TargetMode::External,
                    _ => TargetMode::Internal,
                };
                let rel = Relationship {
                    id: required("Id")?,
                    rel_type: required("Type")?,
                    target: required("Target")?,
                    target_mode,
                };
                if rels.get(&rel.id).is_some() {
                    log::warn!("{}: duplicate relationship id {}", r.part(), rel.id);
                } else {
                    rels.items.push(rel);
                }
                r.skip(child)?;
                Ok(true)
            })
        })?;

        rels.update_next_id();
        Ok(rels)
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

        let mut rels_elem = BytesStart::new("Relationships");
        rels_elem.push_attribute(("xmlns", crate::xml::PR));
        xml.write_event(Event::Start(rels_elem))?;

        for rel in &self.items {
            let mut rel_elem = BytesStart::new("Relationship");
            rel_elem
                .attr("Id", &rel.id)
                .attr("Type", &rel.rel_type)
                .attr("Target", &rel.target);
            if rel.is_external() {
                rel_elem.push_attribute(("TargetMode", "External"));
            }
            xml.write_event(Event::Empty(rel_elem))?;
        }

        xml.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(())
    }

    /// Get a relationship by ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Get a relationship by type (returns first match)
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    /// Get all relationships of a given type
    pub fn all_by_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.items.iter().filter(move |r| r.rel_type == rel_type)
    }

    /// Add an internal relationship, allocating a fresh ID
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        self.add_with_mode(rel_type, target, TargetMode::Internal)
    }

    /// Add an external relationship
    pub fn add_external(&mut self, rel_type: &str, target: &str) -> String {
        self.add_with_mode(rel_type, target, TargetMode::External)
    }

    /// Add a relationship with the given mode, allocating a fresh ID
    pub fn add_with_mode(&mut self, rel_type: &str, target: &str, mode: TargetMode) -> String {
        let id = self.generate_id();
        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: mode,
        });
        id
    }

    /// Remove a relationship by ID
    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.items.iter().position(|r| r.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Iterate over all relationships
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next `rId{n}` not used by this set. The counter wraps to 1 past
    /// `u32::MAX` and then fills gaps.
    fn generate_id(&mut self) -> String {
        loop {
            let id = format!("rId{}", self.next_id);
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Continue numbering after the highest existing `rId{n}`
    fn update_next_id(&mut self) {
        let max_id = self
            .items
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        self.next_id = max_id.checked_add(1).unwrap_or(1);
    }
}

// Well-known relationship types
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const HEADER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header2.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::from_xml("/word/_rels/document.xml.rels", RELS.as_bytes()).unwrap();

        assert_eq!(rels.len(), 3);
        assert_eq!(rels.get("rId7").unwrap().target, "header2.xml");
        assert!(rels.get("rId3").unwrap().is_external());
        assert_eq!(rels.by_type(rel_types::STYLES).unwrap().id, "rId1");
    }

    #[test]
    fn test_allocation_continues_after_max() {
        let mut rels = Relationships::from_xml("/r.rels", RELS.as_bytes()).unwrap();
        assert_eq!(rels.add(rel_types::IMAGE, "media/image1.png"), "rId8");
        assert_eq!(rels.add(rel_types::IMAGE, "media/image2.png"), "rId9");
    }

    #[test]
    fn test_auto_id_on_empty_set() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(rel_types::STYLES, "styles.xml"), "rId1");
        assert_eq!(rels.add(rel_types::NUMBERING, "numbering.xml"), "rId2");
    }

    #[test]
    fn test_write_keeps_order() {
        let rels = Relationships::from_xml("/r.rels", RELS.as_bytes()).unwrap();
        let reparsed = Relationships::from_xml("/r.rels", &rels.to_xml().unwrap()).unwrap();

        let ids: Vec<_> = reparsed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId7", "rId3"]);
        assert_eq!(reparsed, rels);
    }

    #[test]
    fn test_parse_non_empty_relationship_elements() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"></Relationship>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
</Relationships>"#;
        let rels = Relationships::from_xml("/r.rels", xml.as_bytes()).unwrap();

        let ids: Vec<_> = rels.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId2"]);
        assert_eq!(rels.get("rId2").unwrap().target, "header1.xml");
    }

    #[test]
    fn test_allocation_after_largest_id() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId4294967295" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
</Relationships>"#;
        let mut rels = Relationships::from_xml("/r.rels", xml.as_bytes()).unwrap();

        assert_eq!(rels.add(rel_types::IMAGE, "media/image1.png"), "rId2");
        assert_eq!(rels.add(rel_types::IMAGE, "media/image2.png"), "rId3");
    }
}
