//! Document body and block-level content

use crate::document::{Paragraph, SectionProperties, Table};
use crate::error::Result;
use crate::xml::writer;
use crate::xml::{Element, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// Block-level content in a body, header, footer or table cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockContent {
    Paragraph(Paragraph),
    Table(Table),
    /// Unmodelled element (preserved for round-trip)
    Unknown(RawXmlElement),
}

impl BlockContent {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            BlockContent::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            BlockContent::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            BlockContent::Table(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            BlockContent::Paragraph(para) => para.write_to(writer),
            BlockContent::Table(table) => table.write_to(writer),
            BlockContent::Unknown(raw) => raw.write_to(writer),
        }
    }
}

/// Decode the block children of `el`.
///
/// `extra` sees every child first and claims the container-specific ones
/// (`w:sectPr` in a body, `w:tcPr` in a cell).
pub(crate) fn decode_blocks<R, F>(
    r: &mut PartReader<R>,
    el: &Element<'_>,
    mut extra: F,
) -> Result<Vec<BlockContent>>
where
    R: BufRead,
    F: FnMut(&mut PartReader<R>, &Element<'_>) -> Result<bool>,
{
    let mut blocks = Vec::new();

    r.children(el, |r, child| {
        if extra(r, child)? {
            return Ok(true);
        }
        let block = match (child.ns, child.local()) {
            (Ns::W, b"p") => BlockContent::Paragraph(Paragraph::decode(r, child)?),
            (Ns::W, b"tbl") => BlockContent::Table(Table::decode(r, child)?),
            _ => BlockContent::Unknown(RawXmlElement::read(r, child)?),
        };
        blocks.push(block);
        Ok(true)
    })?;

    Ok(blocks)
}

pub(crate) fn write_blocks<W: Write>(writer: &mut Writer<W>, blocks: &[BlockContent]) -> Result<()> {
    for block in blocks {
        block.write_to(writer)?;
    }
    Ok(())
}

/// Document body (w:body)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Body {
    pub content: Vec<BlockContent>,
    /// Properties of the final section (trailing `w:sectPr`)
    pub section: Option<SectionProperties>,
}

impl Body {
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut section = None;
        let content = decode_blocks(r, el, |r, child| {
            if (child.ns, child.local()) == (Ns::W, b"sectPr".as_slice()) {
                section = Some(SectionProperties::decode(r, child)?);
                return Ok(true);
            }
            Ok(false)
        })?;
        Ok(Body { content, section })
    }

    /// Get all top-level paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(BlockContent::as_paragraph)
    }

    /// Get all top-level paragraphs mutably
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.content.iter_mut().filter_map(BlockContent::as_paragraph_mut)
    }

    /// Get all top-level tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(BlockContent::as_table)
    }

    /// Add a paragraph
    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.content.push(BlockContent::Paragraph(para));
    }

    /// Add a table
    pub fn add_table(&mut self, table: Table) {
        self.content.push(BlockContent::Table(table));
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.content.is_empty() && self.section.is_none() {
            return writer::empty(writer, BytesStart::new("w:body"));
        }
        writer::start(writer, BytesStart::new("w:body"))?;
        write_blocks(writer, &self.content)?;
        if let Some(sect) = &self.section {
            sect.write_to(writer)?;
        }
        writer::end(writer, "w:body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    fn decode(xml: &str) -> Body {
        let mut r = PartReader::from_bytes("/word/document.xml", xml.as_bytes(), true);
        r.read_root((Ns::W, b"body"), |r, el| Body::decode(r, el))
            .unwrap()
    }

    #[test]
    fn test_block_order_and_trailing_section() {
        let body = decode(
            r#"<w:body xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
                <w:p><w:r><w:t>one</w:t></w:r></w:p>
                <w:tbl><w:tblPr/><w:tblGrid/></w:tbl>
                <w:customXml w:element="x"/>
                <w:p/>
                <w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>
            </w:body>"#,
        );

        assert_eq!(body.content.len(), 4);
        assert!(matches!(body.content[1], BlockContent::Table(_)));
        assert!(matches!(body.content[2], BlockContent::Unknown(_)));
        assert_eq!(body.paragraphs().count(), 2);
        let sect = body.section.as_ref().unwrap();
        assert_eq!(sect.page_size.as_ref().map(|s| s.w), Some(Some(12240)));
    }

    #[test]
    fn test_empty_body_writes_self_closing() {
        let out = to_xml_string(|w| Body::default().write_to(w)).unwrap();
        assert_eq!(out, "<w:body/>");
    }
}
