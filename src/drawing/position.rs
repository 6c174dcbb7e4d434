//! Floating object positioning (`wp:positionH`, `wp:positionV`)

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, Element, Ns, PartReader, XmlEnum};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `ST_RelFromH`
    pub enum RelFromH {
        Margin => "margin",
        Page => "page",
        Column => "column",
        Character => "character",
        LeftMargin => "leftMargin",
        RightMargin => "rightMargin",
        InsideMargin => "insideMargin",
        OutsideMargin => "outsideMargin",
    }
}

xml_enum! {
    /// `ST_RelFromV`
    pub enum RelFromV {
        Margin => "margin",
        Page => "page",
        Paragraph => "paragraph",
        Line => "line",
        TopMargin => "topMargin",
        BottomMargin => "bottomMargin",
        InsideMargin => "insideMargin",
        OutsideMargin => "outsideMargin",
    }
}

xml_enum! {
    /// `ST_AlignH`
    pub enum AlignH {
        Left => "left",
        Right => "right",
        Center => "center",
        Inside => "inside",
        Outside => "outside",
    }
}

xml_enum! {
    /// `ST_AlignV`
    pub enum AlignV {
        Top => "top",
        Bottom => "bottom",
        Center => "center",
        Inside => "inside",
        Outside => "outside",
    }
}

/// Either an alignment keyword or an absolute offset
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement<A> {
    /// `wp:align`
    Align(A),
    /// `wp:posOffset` in EMUs
    Offset(i64),
}

/// One axis of a floating position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position<F, A> {
    pub relative_from: F,
    pub placement: Placement<A>,
}

/// `wp:positionH`
pub type PositionH = Position<RelFromH, AlignH>;
/// `wp:positionV`
pub type PositionV = Position<RelFromV, AlignV>;

impl<F: XmlEnum, A: XmlEnum> Position<F, A> {
    pub fn offset(relative_from: F, emus: i64) -> Self {
        Self {
            relative_from,
            placement: Placement::Offset(emus),
        }
    }

    pub fn align(relative_from: F, align: A) -> Self {
        Self {
            relative_from,
            placement: Placement::Align(align),
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let relative_from = match r.enum_attr::<F>(el, Ns::None, "relativeFrom")? {
            Some(from) => from,
            None => return Err(r.malformed(Some(el.name()), "missing relativeFrom")),
        };

        let mut placement = None;
        r.children(el, |r, child| {
            let found = match (child.ns, child.local()) {
                (Ns::Wp, b"align") => Placement::Align(A::parse(r.text(child)?.trim())),
                (Ns::Wp, b"posOffset") => Placement::Offset(r.num_text(child)?.unwrap_or(0)),
                _ => return Ok(false),
            };
            if placement.is_some() {
                r.choice_conflict(el, "placement", &child.name());
            } else {
                placement = Some(found);
            }
            Ok(true)
        })?;

        Ok(Self {
            relative_from,
            placement: placement.unwrap_or(Placement::Offset(0)),
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.attr("relativeFrom", self.relative_from.as_str());
        writer::start(writer, elem)?;
        match &self.placement {
            Placement::Align(align) => writer::write_text_element(writer, "wp:align", align.as_str())?,
            Placement::Offset(emus) => {
                writer::write_text_element(writer, "wp:posOffset", &emus.to_string())?
            }
        }
        writer::end(writer, name)
    }
}
