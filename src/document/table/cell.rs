//! Table cell elements (w:tc, w:tcPr)

use crate::document::body::{decode_blocks, write_blocks};
use crate::document::{BlockContent, Paragraph, Table};
use crate::error::Result;
use crate::xml::writer;
use crate::xml::{Element, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

use super::types::{Merge, TableWidth, VerticalAlignment};

/// Table cell (w:tc)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCell {
    pub properties: TableCellProperties,
    /// Paragraphs and nested tables
    pub content: Vec<BlockContent>,
}

/// Table cell properties
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCellProperties {
    pub width: Option<TableWidth>,
    /// Grid columns covered (horizontal merge)
    pub grid_span: Option<u32>,
    /// Legacy horizontal merge
    pub h_merge: Option<Merge>,
    pub v_merge: Option<Merge>,
    /// `w:tcBorders`, kept verbatim
    pub borders: Option<RawXmlElement>,
    /// `w:shd`, kept verbatim
    pub shading: Option<RawXmlElement>,
    pub v_align: Option<VerticalAlignment>,
    pub unknown_children: Vec<RawXmlElement>,
}

const TCPR_ORDER: &[&str] = &[
    "cnfStyle",
    "tcW",
    "gridSpan",
    "hMerge",
    "vMerge",
    "tcBorders",
    "shd",
    "noWrap",
    "tcMar",
    "textDirection",
    "tcFitText",
    "vAlign",
    "hideMark",
    "headers",
    "cellIns",
    "cellDel",
    "cellMerge",
    "tcPrChange",
];

impl TableCellProperties {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut props = Self::default();

        r.children(el, |r, child| {
            if child.ns != Ns::W {
                props.unknown_children.push(RawXmlElement::read(r, child)?);
                return Ok(true);
            }
            match child.local() {
                b"tcW" => props.width = Some(TableWidth::decode(r, child)?),
                b"gridSpan" => props.grid_span = r.num_val(child)?,
                // A bare merge element continues the merge
                b"hMerge" => props.h_merge = Some(r.enum_val(child)?.unwrap_or(Merge::Continue)),
                b"vMerge" => props.v_merge = Some(r.enum_val(child)?.unwrap_or(Merge::Continue)),
                b"vAlign" => props.v_align = r.enum_val(child)?,
                b"tcBorders" => {
                    props.borders = Some(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
                b"shd" => {
                    props.shading = Some(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
                _ => {
                    props.unknown_children.push(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(props)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        writer::start(writer, BytesStart::new("w:tcPr"))?;
        writer::write_in_order(writer, TCPR_ORDER, &self.unknown_children, |w, name| {
            match name {
                "tcW" => match &self.width {
                    Some(width) => width.write_to(w, "w:tcW"),
                    None => Ok(()),
                },
                "gridSpan" => writer::write_opt_val(w, "w:gridSpan", self.grid_span),
                "hMerge" => write_merge(w, "w:hMerge", self.h_merge.as_ref()),
                "vMerge" => write_merge(w, "w:vMerge", self.v_merge.as_ref()),
                "tcBorders" => write_raw(w, self.borders.as_ref()),
                "shd" => write_raw(w, self.shading.as_ref()),
                "vAlign" => writer::write_opt_val(w, "w:vAlign", self.v_align.as_ref()),
                _ => Ok(()),
            }
        })?;
        writer::end(writer, "w:tcPr")
    }
}

fn write_merge<W: Write>(w: &mut Writer<W>, name: &str, merge: Option<&Merge>) -> Result<()> {
    match merge {
        Some(Merge::Continue) => writer::empty(w, BytesStart::new(name)),
        Some(other) => writer::write_val(w, name, other),
        None => Ok(()),
    }
}

fn write_raw<W: Write>(w: &mut Writer<W>, raw: Option<&RawXmlElement>) -> Result<()> {
    match raw {
        Some(raw) => raw.write_to(w),
        None => Ok(()),
    }
}

impl TableCell {
    /// Create a new cell with text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let para = if text.is_empty() {
            Paragraph::default()
        } else {
            Paragraph::new(text)
        };
        TableCell {
            content: vec![BlockContent::Paragraph(para)],
            ..Default::default()
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut properties = TableCellProperties::default();
        let content = decode_blocks(r, el, |r, child| {
            if (child.ns, child.local()) == (Ns::W, b"tcPr".as_slice()) {
                properties = TableCellProperties::decode(r, child)?;
                return Ok(true);
            }
            Ok(false)
        })?;
        Ok(TableCell { properties, content })
    }

    /// Set the cell text (replaces all content with a single paragraph)
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = vec![BlockContent::Paragraph(Paragraph::new(text))];
    }

    /// Get cell text, paragraphs joined by newlines
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Paragraphs directly in this cell
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(BlockContent::as_paragraph)
    }

    /// Tables nested directly in this cell
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(BlockContent::as_table)
    }

    /// Grid columns covered, at least one
    pub fn grid_span(&self) -> u32 {
        self.properties.grid_span.unwrap_or(1).max(1)
    }

    pub fn v_merge(&self) -> Option<&Merge> {
        self.properties.v_merge.as_ref()
    }

    /// Set horizontal merge (grid span)
    pub fn set_grid_span(&mut self, span: u32) {
        self.properties.grid_span = Some(span);
    }

    /// Set vertical merge
    pub fn set_v_merge(&mut self, v_merge: Merge) {
        self.properties.v_merge = Some(v_merge);
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer::start(writer, BytesStart::new("w:tc"))?;
        self.properties.write_to(writer)?;
        // A cell must end with a paragraph
        if self.content.is_empty() {
            Paragraph::default().write_to(writer)?;
        } else {
            write_blocks(writer, &self.content)?;
        }
        writer::end(writer, "w:tc")
    }
}

impl TableCell {
    /// Add a paragraph to the cell
    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.content.push(BlockContent::Paragraph(para));
    }

    /// Nest a table in the cell
    pub fn add_table(&mut self, table: Table) {
        self.content.push(BlockContent::Table(table));
    }

    /// Set cell width in twips
    pub fn set_width(&mut self, twips: i64) {
        self.properties.width = Some(TableWidth::dxa(twips));
    }
}
