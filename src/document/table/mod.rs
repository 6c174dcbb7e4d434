//! Table elements (w:tbl, w:tr, w:tc)

mod cell;
mod row;
mod types;

pub use cell::{TableCell, TableCellProperties};
pub use row::{RowHeight, RowProperties, TableRow};
pub use types::{
    GridColumn, GridIssue, HeightRule, Merge, TableAlignment, TableLayout, TableWidth,
    VerticalAlignment, WidthType,
};

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// Table element (w:tbl)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub properties: TableProperties,
    /// Table grid
    pub grid: Vec<GridColumn>,
    pub rows: Vec<TableRow>,
    /// Unmodelled table-level elements such as bookmarks
    pub unknown_children: Vec<RawXmlElement>,
}

/// Table properties (w:tblPr)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableProperties {
    /// Style ID
    pub style: Option<String>,
    pub width: Option<TableWidth>,
    pub justification: Option<TableAlignment>,
    pub layout: Option<TableLayout>,
    /// `w:tblBorders`, kept verbatim
    pub borders: Option<RawXmlElement>,
    pub unknown_children: Vec<RawXmlElement>,
}

const TBLPR_ORDER: &[&str] = &[
    "tblStyle",
    "tblpPr",
    "tblOverlap",
    "bidiVisual",
    "tblStyleRowBandSize",
    "tblStyleColBandSize",
    "tblW",
    "jc",
    "tblCellSpacing",
    "tblInd",
    "tblBorders",
    "shd",
    "tblLayout",
    "tblCellMar",
    "tblLook",
    "tblCaption",
    "tblDescription",
    "tblPrChange",
];

impl TableProperties {
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
                b"tblStyle" => props.style = child.val().map(str::to_string),
                b"tblW" => props.width = Some(TableWidth::decode(r, child)?),
                b"jc" => props.justification = r.enum_val(child)?,
                b"tblLayout" => props.layout = r.enum_attr(child, Ns::W, "type")?,
                b"tblBorders" => {
                    props.borders = Some(RawXmlElement::read(r, child)?);
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
            return writer::empty(writer, BytesStart::new("w:tblPr"));
        }
        writer::start(writer, BytesStart::new("w:tblPr"))?;
        writer::write_in_order(writer, TBLPR_ORDER, &self.unknown_children, |w, name| {
            match name {
                "tblStyle" => writer::write_opt_val(w, "w:tblStyle", self.style.as_deref()),
                "tblW" => match &self.width {
                    Some(width) => width.write_to(w, "w:tblW"),
                    None => Ok(()),
                },
                "jc" => writer::write_opt_val(w, "w:jc", self.justification.as_ref()),
                "tblBorders" => match &self.borders {
                    Some(raw) => raw.write_to(w),
                    None => Ok(()),
                },
                "tblLayout" => match &self.layout {
                    Some(layout) => {
                        let mut elem = BytesStart::new("w:tblLayout");
                        elem.attr("w:type", layout);
                        writer::empty(w, elem)
                    }
                    None => Ok(()),
                },
                _ => Ok(()),
            }
        })?;
        writer::end(writer, "w:tblPr")
    }
}

impl Table {
    /// Create a new table with the specified number of rows and columns
    pub fn new(rows: usize, cols: usize) -> Self {
        let table_rows = (0..rows).map(|_| TableRow::new(cols)).collect();
        let grid = (0..cols).map(|_| GridColumn::default()).collect();

        Table {
            properties: TableProperties {
                width: Some(TableWidth::auto()),
                ..Default::default()
            },
            grid,
            rows: table_rows,
            ..Default::default()
        }
    }

    /// Create a table from rows of cell texts
    pub fn from_data<S: Into<String> + Clone>(data: &[&[S]]) -> Self {
        let rows: Vec<TableRow> = data
            .iter()
            .map(|row| TableRow::from_texts(row.iter().cloned()))
            .collect();
        let cols = rows.iter().map(TableRow::grid_width).max().unwrap_or(0);

        Table {
            grid: (0..cols).map(|_| GridColumn::default()).collect(),
            rows,
            ..Default::default()
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut table = Table::default();

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::W, b"tblPr") => table.properties = TableProperties::decode(r, child)?,
                (Ns::W, b"tblGrid") => {
                    r.children(child, |r, col| {
                        if (col.ns, col.local()) == (Ns::W, b"gridCol".as_slice()) {
                            table.grid.push(GridColumn {
                                width: r.num_attr(col, Ns::W, "w")?,
                            });
                        }
                        Ok(false)
                    })?;
                }
                (Ns::W, b"tr") => table.rows.push(TableRow::decode(r, child)?),
                _ => table.unknown_children.push(RawXmlElement::read(r, child)?),
            }
            Ok(true)
        })?;

        for issue in table.validate() {
            log::warn!("{}: table grid: {}", r.part(), issue);
        }

        Ok(table)
    }

    /// Get row count
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get column count from the grid, or the first row when there is no grid
    pub fn column_count(&self) -> usize {
        if self.grid.is_empty() {
            self.rows.first().map(TableRow::grid_width).unwrap_or(0)
        } else {
            self.grid.len()
        }
    }

    /// Get cell at position (cell index, not grid column)
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    /// Get mutable cell at position
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter()
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Set cell text at position
    pub fn set_cell_text(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.set_text(text);
        }
    }

    /// Set column width in twips
    pub fn set_column_width(&mut self, col: usize, width: u32) {
        if let Some(column) = self.grid.get_mut(col) {
            column.width = Some(width);
        }
    }

    /// Check that cell spans line up with the grid and vertical merges have an origin.
    ///
    /// Rows are compared against the grid only when the table has one.
    pub fn validate(&self) -> Vec<GridIssue> {
        let mut issues = Vec::new();
        let grid = self.grid.len();
        let mut merged_above: Vec<usize> = Vec::new();

        for (index, row) in self.rows.iter().enumerate() {
            let spans = row.grid_width();
            if grid > 0 && spans != grid {
                issues.push(GridIssue::RowWidth { row: index, spans, grid });
            }

            let columns = row.cell_columns();
            for (cell, &column) in row.cells.iter().zip(&columns) {
                if cell.v_merge() == Some(&Merge::Continue) && !merged_above.contains(&column) {
                    issues.push(GridIssue::OrphanMergeContinue { row: index, column });
                }
            }

            merged_above = row
                .cells
                .iter()
                .zip(columns)
                .filter(|(cell, _)| cell.v_merge().is_some())
                .map(|(_, column)| column)
                .collect();
        }

        issues
    }

    /// Write to XML writer
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer::start(writer, BytesStart::new("w:tbl"))?;

        // tblPr and tblGrid are required even when empty
        self.properties.write_to(writer)?;

        writer::start(writer, BytesStart::new("w:tblGrid"))?;
        for col in &self.grid {
            let mut elem = BytesStart::new("w:gridCol");
            elem.opt_attr("w:w", col.width);
            writer::empty(writer, elem)?;
        }
        writer::end(writer, "w:tblGrid")?;

        for row in &self.rows {
            row.write_to(writer)?;
        }
        for child in &self.unknown_children {
            child.write_to(writer)?;
        }

        writer::end(writer, "w:tbl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn decode(xml: &str) -> Table {
        let mut r = PartReader::from_bytes("/word/document.xml", xml.as_bytes(), true);
        r.read_root((Ns::W, b"tbl"), |r, el| Table::decode(r, el))
            .unwrap()
    }

    #[test]
    fn test_decode_nested_table() {
        let xml = format!(
            r#"<w:tbl {W}>
                <w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/><w:tblLook w:val="04A0"/></w:tblPr>
                <w:tblGrid><w:gridCol w:w="4675"/><w:gridCol w:w="4675"/></w:tblGrid>
                <w:tr>
                    <w:tc><w:tcPr><w:tcW w:w="4675" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc>
                    <w:tc>
                        <w:tbl><w:tblPr/><w:tblGrid><w:gridCol/></w:tblGrid>
                            <w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr>
                        </w:tbl>
                        <w:p/>
                    </w:tc>
                </w:tr>
            </w:tbl>"#
        );
        let table = decode(&xml);

        assert_eq!(table.properties.style.as_deref(), Some("TableGrid"));
        assert_eq!(table.properties.width, Some(TableWidth::auto()));
        assert_eq!(table.properties.unknown_children.len(), 1);
        assert_eq!(table.grid.len(), 2);
        assert_eq!(table.cell(0, 0).unwrap().text(), "A");

        let outer = table.cell(0, 1).unwrap();
        let inner = outer.tables().next().unwrap();
        assert_eq!(inner.cell(0, 0).unwrap().text(), "inner");
        assert_eq!(outer.paragraphs().count(), 1);
        assert!(table.validate().is_empty());
    }

    #[test]
    fn test_validate_spans_and_merges() {
        let mut table = Table::new(2, 3);
        table.rows[0].cells[0].set_grid_span(2);
        assert_eq!(
            table.validate(),
            vec![GridIssue::RowWidth { row: 0, spans: 4, grid: 3 }]
        );

        let mut table = Table::new(2, 2);
        table.rows[1].cells[1].set_v_merge(Merge::Continue);
        assert_eq!(
            table.validate(),
            vec![GridIssue::OrphanMergeContinue { row: 1, column: 1 }]
        );

        table.rows[0].cells[1].set_v_merge(Merge::Restart);
        assert!(table.validate().is_empty());
    }

    #[test]
    fn test_bare_vmerge_continues() {
        let xml = format!(
            r#"<w:tbl {W}><w:tblGrid><w:gridCol/></w:tblGrid>
                <w:tr><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p/></w:tc></w:tr>
                <w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr>
            </w:tbl>"#
        );
        let table = decode(&xml);
        assert_eq!(table.cell(1, 0).unwrap().v_merge(), Some(&Merge::Continue));

        let out = to_xml_string(|w| table.write_to(w)).unwrap();
        assert!(out.contains(r#"<w:vMerge w:val="restart"/>"#));
        assert!(out.contains("<w:vMerge/>"));
    }

    #[test]
    fn test_write_required_children() {
        let mut table = Table::new(1, 1);
        table.properties.width = None;
        table.rows[0].cells[0].content.clear();
        let out = to_xml_string(|w| table.write_to(w)).unwrap();
        assert_eq!(
            out,
            "<w:tbl><w:tblPr/><w:tblGrid><w:gridCol/></w:tblGrid>\
             <w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>"
        );
    }
}
