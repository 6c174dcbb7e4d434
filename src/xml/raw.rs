//! Raw XML subtrees kept verbatim inside property blocks

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::BufRead;

use crate::error::Result;
use crate::xml::{Element, PartReader};

/// Raw XML node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawXmlNode {
    /// Element node
    Element(RawXmlElement),
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
}

/// Raw XML element with attributes and children.
///
/// Names keep the producer's prefixes; the part root's namespace
/// declarations are preserved alongside so the prefixes stay bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawXmlElement {
    /// Full element name (with prefix, e.g., "w:tblBorders")
    pub name: String,
    /// Attributes as (name, value) pairs
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<RawXmlNode>,
    /// Whether this was a self-closing element
    pub self_closing: bool,
}

impl RawXmlElement {
    /// Create a new empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Capture `el` and everything below it
    pub fn read<R: BufRead>(reader: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut raw = Self {
            name: el.name(),
            attributes: el
                .attrs()
                .iter()
                .map(|a| (a.qname.clone(), a.value.clone()))
                .collect(),
            children: Vec::new(),
            self_closing: el.empty,
        };
        if el.empty {
            return Ok(raw);
        }

        let mut buf = Vec::new();
        loop {
            match reader.next_event(&mut buf, el)? {
                Event::Start(e) => {
                    let child = reader.element(&e, false)?;
                    raw.children
                        .push(RawXmlNode::Element(Self::read(reader, &child)?));
                }
                Event::Empty(e) => {
                    let child = reader.element(&e, true)?;
                    raw.children
                        .push(RawXmlNode::Element(Self::read(reader, &child)?));
                }
                Event::Text(t) => {
                    let text = t.unescape()?.into_owned();
                    if !text.trim().is_empty() {
                        raw.children.push(RawXmlNode::Text(text));
                    }
                }
                Event::Comment(c) => {
                    raw.children
                        .push(RawXmlNode::Comment(String::from_utf8_lossy(&c).into_owned()));
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(reader.malformed(Some(raw.name.clone()), "unexpected end of input"))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(raw)
    }

    /// Write element to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        }

        Ok(())
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: RawXmlElement) -> Self {
        self.self_closing = false;
        self.children.push(RawXmlNode::Element(child));
        self
    }

    /// Local part of the qualified name
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Attribute value by qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl RawXmlNode {
    /// Write node to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            RawXmlNode::Element(e) => e.write_to(writer),
            RawXmlNode::Text(t) => {
                writer.write_event(Event::Text(BytesText::new(t)))?;
                Ok(())
            }
            RawXmlNode::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::new(c)))?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Ns;

    #[test]
    fn test_raw_element_roundtrip() {
        let xml = r#"<w:tblBorders xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:top w:val="single" w:sz="4"/><!--note--></w:tblBorders>"#;
        let mut reader = PartReader::from_bytes("/t.xml", xml.as_bytes(), false);

        let raw = reader
            .read_root((Ns::W, b"tblBorders"), |r, el| RawXmlElement::read(r, el))
            .unwrap();

        assert_eq!(raw.name, "w:tblBorders");
        assert_eq!(raw.children.len(), 2);
        match &raw.children[0] {
            RawXmlNode::Element(top) => {
                assert_eq!(top.name, "w:top");
                assert_eq!(top.attr("w:sz"), Some("4"));
                assert!(top.self_closing);
            }
            other => panic!("unexpected node {:?}", other),
        }

        let mut writer = Writer::new(Vec::new());
        raw.write_to(&mut writer).unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert!(out.contains(r#"<w:top w:val="single" w:sz="4"/>"#));
        assert!(out.contains("<!--note-->"));
    }
}
