//! Table row elements (w:tr)

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, LongHexNum, Ns, PartReader, RawXmlElement, XmlEnum};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

use super::cell::TableCell;
use super::types::HeightRule;

/// Table row (w:tr)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableRow {
    pub rsid_r: Option<LongHexNum>,
    pub rsid_tr: Option<LongHexNum>,
    /// `w14:paraId`
    pub para_id: Option<LongHexNum>,
    /// `w14:textId`
    pub text_id: Option<LongHexNum>,
    /// `w:tblPrEx`, kept verbatim
    pub property_exceptions: Option<RawXmlElement>,
    pub properties: RowProperties,
    pub cells: Vec<TableCell>,
    /// Unmodelled row-level elements such as bookmarks
    pub unknown_children: Vec<RawXmlElement>,
}

/// `w:trHeight`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowHeight {
    /// Twips
    pub val: u32,
    pub rule: Option<HeightRule>,
}

/// Row properties (w:trPr)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowProperties {
    pub height: Option<RowHeight>,
    /// Repeat as header row on each page
    pub header: Option<bool>,
    pub cant_split: Option<bool>,
    pub unknown_children: Vec<RawXmlElement>,
}

const TRPR_ORDER: &[&str] = &[
    "cnfStyle",
    "divId",
    "gridBefore",
    "gridAfter",
    "wBefore",
    "wAfter",
    "cantSplit",
    "trHeight",
    "tblHeader",
    "tblCellSpacing",
    "jc",
    "hidden",
    "ins",
    "del",
    "trPrChange",
];

impl RowProperties {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut props = Self::default();

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::W, b"trHeight") => {
                    props.height = Some(RowHeight {
                        val: r.num_attr(child, Ns::W, "val")?.unwrap_or(0),
                        rule: r.enum_attr(child, Ns::W, "hRule")?,
                    })
                }
                (Ns::W, b"tblHeader") => props.header = Some(r.toggle(child)?),
                (Ns::W, b"cantSplit") => props.cant_split = Some(r.toggle(child)?),
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
        writer::start(writer, BytesStart::new("w:trPr"))?;
        writer::write_in_order(writer, TRPR_ORDER, &self.unknown_children, |w, name| {
            match name {
                "cantSplit" => writer::write_toggle(w, "w:cantSplit", self.cant_split),
                "trHeight" => match &self.height {
                    Some(h) => {
                        let mut elem = BytesStart::new("w:trHeight");
                        elem.attr("w:val", h.val)
                            .opt_attr("w:hRule", h.rule.as_ref().map(XmlEnum::as_str));
                        writer::empty(w, elem)
                    }
                    None => Ok(()),
                },
                "tblHeader" => writer::write_toggle(w, "w:tblHeader", self.header),
                _ => Ok(()),
            }
        })?;
        writer::end(writer, "w:trPr")
    }
}

impl TableRow {
    /// Create a new row with empty cells
    pub fn new(cell_count: usize) -> Self {
        let cells = (0..cell_count).map(|_| TableCell::new("")).collect();
        TableRow {
            cells,
            ..Default::default()
        }
    }

    /// Create a row from cell texts
    pub fn from_texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        let cells = texts.into_iter().map(TableCell::new).collect();
        TableRow {
            cells,
            ..Default::default()
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut row = TableRow {
            rsid_r: r.hex_attr(el, Ns::W, "rsidR")?,
            rsid_tr: r.hex_attr(el, Ns::W, "rsidTr")?,
            para_id: r.hex_attr(el, Ns::W14, "paraId")?,
            text_id: r.hex_attr(el, Ns::W14, "textId")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::W, b"tblPrEx") => row.property_exceptions = Some(RawXmlElement::read(r, child)?),
                (Ns::W, b"trPr") => row.properties = RowProperties::decode(r, child)?,
                (Ns::W, b"tc") => row.cells.push(TableCell::decode(r, child)?),
                _ => row.unknown_children.push(RawXmlElement::read(r, child)?),
            }
            Ok(true)
        })?;

        Ok(row)
    }

    /// Get cell count
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get cell by index
    pub fn cell(&self, index: usize) -> Option<&TableCell> {
        self.cells.get(index)
    }

    /// Get mutable cell by index
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut TableCell> {
        self.cells.get_mut(index)
    }

    /// Add a cell
    pub fn add_cell(&mut self, cell: TableCell) {
        self.cells.push(cell);
    }

    /// Grid column each cell starts at
    pub fn cell_columns(&self) -> Vec<usize> {
        let mut column = 0;
        self.cells
            .iter()
            .map(|cell| {
                let start = column;
                column += cell.grid_span() as usize;
                start
            })
            .collect()
    }

    /// Grid columns covered by all cells
    pub fn grid_width(&self) -> usize {
        self.cells.iter().map(|c| c.grid_span() as usize).sum()
    }

    pub fn is_header(&self) -> bool {
        self.properties.header.unwrap_or(false)
    }

    /// Mark the row as a repeating header row
    pub fn set_header(&mut self, header: bool) {
        self.properties.header = Some(header);
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:tr");
        start
            .opt_attr("w14:paraId", self.para_id)
            .opt_attr("w14:textId", self.text_id)
            .opt_attr("w:rsidR", self.rsid_r)
            .opt_attr("w:rsidTr", self.rsid_tr);
        writer::start(writer, start)?;

        if let Some(ex) = &self.property_exceptions {
            ex.write_to(writer)?;
        }
        self.properties.write_to(writer)?;
        for cell in &self.cells {
            cell.write_to(writer)?;
        }
        for child in &self.unknown_children {
            child.write_to(writer)?;
        }

        writer::end(writer, "w:tr")
    }
}
