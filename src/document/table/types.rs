//! Table-related types and enums

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, XmlEnum};
use crate::xml::{Element, Ns, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `ST_TblWidth`
    pub enum WidthType {
        Nil => "nil",
        Pct => "pct",
        Dxa => "dxa",
        Auto => "auto",
    }
}

xml_enum! {
    /// `w:tblPr/w:jc`
    pub enum TableAlignment {
        Left => "left",
        Start => "start",
        Center => "center",
        Right => "right",
        End => "end",
    }
}

xml_enum! {
    pub enum TableLayout {
        Fixed => "fixed",
        Autofit => "autofit",
    }
}

xml_enum! {
    /// `ST_Merge`, used by `w:vMerge` and `w:hMerge`
    pub enum Merge {
        Restart => "restart",
        Continue => "continue",
    }
}

xml_enum! {
    /// `w:tcPr/w:vAlign`
    pub enum VerticalAlignment {
        Top => "top",
        Center => "center",
        Bottom => "bottom",
        Both => "both",
    }
}

xml_enum! {
    /// `w:trHeight/@w:hRule`
    pub enum HeightRule {
        Auto => "auto",
        Exact => "exact",
        AtLeast => "atLeast",
    }
}

/// Grid column definition
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridColumn {
    /// Width in twips
    pub width: Option<u32>,
}

/// Width of a table or cell (`tblW`, `tcW`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableWidth {
    /// Twips for `dxa`, fiftieths of a percent for `pct`
    pub w: i64,
    pub width_type: WidthType,
}

impl TableWidth {
    pub fn auto() -> Self {
        Self {
            w: 0,
            width_type: WidthType::Auto,
        }
    }

    pub fn dxa(twips: i64) -> Self {
        Self {
            w: twips,
            width_type: WidthType::Dxa,
        }
    }

    /// Percentage of the available width
    pub fn percent(pct: f64) -> Self {
        Self {
            w: (pct * 50.0).round() as i64,
            width_type: WidthType::Pct,
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &PartReader<R>, el: &Element<'_>) -> Result<Self> {
        Ok(Self {
            w: r.num_attr(el, Ns::W, "w")?.unwrap_or(0),
            width_type: r.enum_attr(el, Ns::W, "type")?.unwrap_or(WidthType::Dxa),
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.attr("w:w", self.w).attr("w:type", self.width_type.as_str());
        writer::empty(writer, elem)
    }
}

/// Grid misalignment found by [`Table::validate`](super::Table::validate)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridIssue {
    /// The spans of a row do not add up to the grid
    RowWidth { row: usize, spans: usize, grid: usize },
    /// A vertical merge continues with nothing merged above it
    OrphanMergeContinue { row: usize, column: usize },
}

impl std::fmt::Display for GridIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridIssue::RowWidth { row, spans, grid } => {
                write!(f, "row {} spans {} grid columns, table grid has {}", row, spans, grid)
            }
            GridIssue::OrphanMergeContinue { row, column } => {
                write!(f, "row {} column {} continues a merge with no cell above", row, column)
            }
        }
    }
}
