//! Text wrapping around anchored objects
//!
//! The five wrap elements form a choice group. Parsed input that carries
//! several keeps one, by the precedence None, Square, Through,
//! TopAndBottom, Tight.

use crate::drawing::types::{EffectExtent, Point2D};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, Element, Ns, OptBool, PartReader, XmlEnum};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `ST_WrapText`
    pub enum WrapText {
        BothSides => "bothSides",
        Left => "left",
        Right => "right",
        Largest => "largest",
    }
}

/// Wrap policy choice
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Wrap {
    /// `wp:wrapNone`
    None,
    /// `wp:wrapSquare`
    Square(WrapSquare),
    /// `wp:wrapTight`
    Tight(WrapPath),
    /// `wp:wrapThrough`
    Through(WrapPath),
    /// `wp:wrapTopAndBottom`
    TopAndBottom(WrapTopBottom),
}

/// `wp:wrapSquare`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapSquare {
    pub wrap_text: WrapText,
    pub dist_t: Option<u32>,
    pub dist_b: Option<u32>,
    pub dist_l: Option<u32>,
    pub dist_r: Option<u32>,
    pub effect_extent: Option<EffectExtent>,
}

/// `wp:wrapTight` / `wp:wrapThrough`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapPath {
    pub wrap_text: WrapText,
    pub dist_l: Option<u32>,
    pub dist_r: Option<u32>,
    pub polygon: WrapPolygon,
}

/// `wp:wrapPolygon`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapPolygon {
    pub edited: OptBool,
    pub start: Point2D,
    pub line_to: Vec<Point2D>,
}

/// `wp:wrapTopAndBottom`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapTopBottom {
    pub dist_t: Option<u32>,
    pub dist_b: Option<u32>,
    pub effect_extent: Option<EffectExtent>,
}

impl WrapSquare {
    pub fn new(wrap_text: WrapText) -> Self {
        Self {
            wrap_text,
            dist_t: None,
            dist_b: None,
            dist_l: None,
            dist_r: None,
            effect_extent: None,
        }
    }
}

impl Wrap {
    /// Element name of the active variant
    pub fn tag(&self) -> &'static str {
        match self {
            Wrap::None => "wp:wrapNone",
            Wrap::Square(_) => "wp:wrapSquare",
            Wrap::Tight(_) => "wp:wrapTight",
            Wrap::Through(_) => "wp:wrapThrough",
            Wrap::TopAndBottom(_) => "wp:wrapTopAndBottom",
        }
    }

    /// Lower ranks win when a parsed anchor carries several wraps
    fn rank(&self) -> u8 {
        match self {
            Wrap::None => 0,
            Wrap::Square(_) => 1,
            Wrap::Through(_) => 2,
            Wrap::TopAndBottom(_) => 3,
            Wrap::Tight(_) => 4,
        }
    }

    /// Decode a wrap element if `child` is one
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, child: &Element<'_>) -> Result<Option<Self>> {
        let wrap = match (child.ns, child.local()) {
            (Ns::Wp, b"wrapNone") => {
                r.skip(child)?;
                Wrap::None
            }
            (Ns::Wp, b"wrapSquare") => {
                let mut square = WrapSquare {
                    wrap_text: wrap_text(r, child)?,
                    dist_t: r.num_attr(child, Ns::None, "distT")?,
                    dist_b: r.num_attr(child, Ns::None, "distB")?,
                    dist_l: r.num_attr(child, Ns::None, "distL")?,
                    dist_r: r.num_attr(child, Ns::None, "distR")?,
                    effect_extent: None,
                };
                square.effect_extent = effect_extent(r, child)?;
                Wrap::Square(square)
            }
            (Ns::Wp, b"wrapTight") => Wrap::Tight(WrapPath::decode(r, child)?),
            (Ns::Wp, b"wrapThrough") => Wrap::Through(WrapPath::decode(r, child)?),
            (Ns::Wp, b"wrapTopAndBottom") => {
                let mut tb = WrapTopBottom {
                    dist_t: r.num_attr(child, Ns::None, "distT")?,
                    dist_b: r.num_attr(child, Ns::None, "distB")?,
                    effect_extent: None,
                };
                tb.effect_extent = effect_extent(r, child)?;
                Wrap::TopAndBottom(tb)
            }
            _ => return Ok(None),
        };
        Ok(Some(wrap))
    }

    /// Merge a newly decoded wrap into `slot`, keeping the higher-precedence one
    pub(crate) fn choose<R: BufRead>(r: &PartReader<R>, parent: &Element<'_>, slot: &mut Option<Wrap>, wrap: Wrap) {
        match slot.take() {
            None => *slot = Some(wrap),
            Some(kept) if kept.rank() <= wrap.rank() => {
                r.choice_conflict(parent, kept.tag(), wrap.tag());
                *slot = Some(kept);
            }
            Some(dropped) => {
                r.choice_conflict(parent, wrap.tag(), dropped.tag());
                *slot = Some(wrap);
            }
        }
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            Wrap::None => writer::empty(writer, BytesStart::new("wp:wrapNone")),
            Wrap::Square(square) => {
                let mut elem = BytesStart::new("wp:wrapSquare");
                elem.attr("wrapText", square.wrap_text.as_str())
                    .opt_attr("distT", square.dist_t)
                    .opt_attr("distB", square.dist_b)
                    .opt_attr("distL", square.dist_l)
                    .opt_attr("distR", square.dist_r);
                write_with_extent(writer, elem, "wp:wrapSquare", square.effect_extent.as_ref())
            }
            Wrap::Tight(path) => path.write_to(writer, "wp:wrapTight"),
            Wrap::Through(path) => path.write_to(writer, "wp:wrapThrough"),
            Wrap::TopAndBottom(tb) => {
                let mut elem = BytesStart::new("wp:wrapTopAndBottom");
                elem.opt_attr("distT", tb.dist_t).opt_attr("distB", tb.dist_b);
                write_with_extent(writer, elem, "wp:wrapTopAndBottom", tb.effect_extent.as_ref())
            }
        }
    }
}

impl WrapPath {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut path = Self {
            wrap_text: wrap_text(r, el)?,
            dist_l: r.num_attr(el, Ns::None, "distL")?,
            dist_r: r.num_attr(el, Ns::None, "distR")?,
            polygon: WrapPolygon::default(),
        };

        r.children(el, |r, child| {
            if (child.ns, child.local()) != (Ns::Wp, b"wrapPolygon".as_slice()) {
                return Ok(false);
            }
            path.polygon.edited = r.bool_attr(child, Ns::None, "edited")?;
            r.children(child, |r, pt| {
                match (pt.ns, pt.local()) {
                    (Ns::Wp, b"start") => path.polygon.start = Point2D::decode(r, pt)?,
                    (Ns::Wp, b"lineTo") => path.polygon.line_to.push(Point2D::decode(r, pt)?),
                    _ => {}
                }
                Ok(false)
            })?;
            Ok(true)
        })?;

        Ok(path)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.attr("wrapText", self.wrap_text.as_str())
            .opt_attr("distL", self.dist_l)
            .opt_attr("distR", self.dist_r);
        writer::start(writer, elem)?;

        let mut polygon = BytesStart::new("wp:wrapPolygon");
        polygon.bool_attr("edited", self.polygon.edited);
        writer::start(writer, polygon)?;
        self.polygon.start.write_to(writer, "wp:start")?;
        for pt in &self.polygon.line_to {
            pt.write_to(writer, "wp:lineTo")?;
        }
        writer::end(writer, "wp:wrapPolygon")?;

        writer::end(writer, name)
    }
}

fn wrap_text<R: BufRead>(r: &PartReader<R>, el: &Element<'_>) -> Result<WrapText> {
    Ok(r
        .enum_attr(el, Ns::None, "wrapText")?
        .unwrap_or(WrapText::BothSides))
}

fn effect_extent<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Option<EffectExtent>> {
    let mut extent = None;
    r.children(el, |r, child| {
        if (child.ns, child.local()) == (Ns::Wp, b"effectExtent".as_slice()) {
            extent = Some(EffectExtent::decode(r, child)?);
        }
        Ok(false)
    })?;
    Ok(extent)
}

fn write_with_extent<W: Write>(
    writer: &mut Writer<W>,
    elem: BytesStart<'_>,
    name: &str,
    extent: Option<&EffectExtent>,
) -> Result<()> {
    match extent {
        Some(extent) => {
            writer::start(writer, elem)?;
            extent.write_to(writer)?;
            writer::end(writer, name)
        }
        None => writer::empty(writer, elem),
    }
}
