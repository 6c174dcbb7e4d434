//! Header and footer parts (w:hdr, w:ftr)

use crate::document::body::{decode_blocks, write_blocks};
use crate::document::{BlockContent, Paragraph, Table};
use crate::error::Result;
use crate::opc::PartUri;
use crate::xml::writer;
use crate::xml::{self, Ns, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::Write;

/// Which of the two part kinds this is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

impl HeaderFooterKind {
    /// Local name of the root element
    pub fn root_name(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "hdr",
            HeaderFooterKind::Footer => "ftr",
        }
    }

    /// File name stem of new parts, as in `header1.xml`
    pub(crate) fn file_stem(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "header",
            HeaderFooterKind::Footer => "footer",
        }
    }

    pub(crate) fn content_type(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => crate::opc::HEADER,
            HeaderFooterKind::Footer => crate::opc::FOOTER,
        }
    }

    pub(crate) fn rel_type(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => crate::opc::rel_types::HEADER,
            HeaderFooterKind::Footer => crate::opc::rel_types::FOOTER,
        }
    }
}

/// A header or footer part
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderFooter {
    pub kind: HeaderFooterKind,
    /// Part the content is stored in
    pub uri: PartUri,
    /// Root attributes as parsed, namespace declarations included
    pub root_attributes: Vec<(String, String)>,
    pub content: Vec<BlockContent>,
}

impl HeaderFooter {
    /// Empty header or footer stored at `uri`
    pub fn new(kind: HeaderFooterKind, uri: PartUri) -> Self {
        Self {
            kind,
            uri,
            root_attributes: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Decode a `w:hdr` / `w:ftr` part
    pub fn from_xml(kind: HeaderFooterKind, uri: PartUri, data: &[u8], strict: bool) -> Result<Self> {
        let mut r = PartReader::from_bytes(uri.as_str(), data, strict);
        let (root_attributes, content) =
            r.read_root((Ns::W, kind.root_name().as_bytes()), |r, el| {
                let attrs = el.raw_attributes();
                let content = decode_blocks(r, el, |_, _| Ok(false))?;
                Ok((attrs, content))
            })?;
        Ok(Self {
            kind,
            uri,
            root_attributes,
            content,
        })
    }

    /// Encode the part
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let name = format!("w:{}", self.kind.root_name());
        let mut attrs = self.root_attributes.clone();
        xml::complete_root_attributes(&mut attrs);

        writer::write_decl(writer)?;
        let mut start = BytesStart::new(name.as_str());
        for (key, value) in &attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer::start(writer, start)?;
        // A header or footer needs at least one paragraph
        if self.content.is_empty() {
            Paragraph::default().write_to(writer)?;
        } else {
            write_blocks(writer, &self.content)?;
        }
        writer::end(writer, &name)
    }

    /// Paragraphs at the top level of the part
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(BlockContent::as_paragraph)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(BlockContent::as_table)
    }

    /// Text of the top-level paragraphs, one per line
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.content.push(BlockContent::Paragraph(para));
    }
}
