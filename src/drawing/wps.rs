//! Word processing shapes (`wps:wsp`)

use crate::drawing::shape_props::ShapeProperties;
use crate::drawing::types::{NonVisualProps, ShapeLocks};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, Element, Ns, OptBool, PartReader, RawXmlElement, XmlEnum};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `ST_TextVerticalType`
    pub enum TextVertical {
        Horz => "horz",
        Vert => "vert",
        Vert270 => "vert270",
        WordArtVert => "wordArtVert",
        EaVert => "eaVert",
        MongolianVert => "mongolianVert",
        WordArtVertRtl => "wordArtVertRtl",
    }
}

xml_enum! {
    /// `ST_TextWrappingType`
    pub enum TextWrapping {
        None => "none",
        Square => "square",
    }
}

xml_enum! {
    /// `ST_TextAnchoringType`
    pub enum TextAnchor {
        Top => "t",
        Center => "ctr",
        Bottom => "b",
        Justified => "just",
        Distributed => "dist",
    }
}

/// Autofit choice inside `a:bodyPr`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Autofit {
    /// `a:noAutofit`
    None,
    /// `a:normAutofit`
    Normal,
    /// `a:spAutoFit`
    Shape,
}

impl Autofit {
    fn tag(self) -> &'static str {
        match self {
            Autofit::None => "a:noAutofit",
            Autofit::Normal => "a:normAutofit",
            Autofit::Shape => "a:spAutoFit",
        }
    }
}

/// `wps:bodyPr`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyProperties {
    pub rot: Option<i64>,
    pub vert: Option<TextVertical>,
    pub wrap: Option<TextWrapping>,
    pub l_ins: Option<i64>,
    pub t_ins: Option<i64>,
    pub r_ins: Option<i64>,
    pub b_ins: Option<i64>,
    pub anchor: Option<TextAnchor>,
    pub anchor_ctr: OptBool,
    pub upright: OptBool,
    pub autofit: Option<Autofit>,
}

impl BodyProperties {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut body = Self {
            rot: r.num_attr(el, Ns::None, "rot")?,
            vert: r.enum_attr(el, Ns::None, "vert")?,
            wrap: r.enum_attr(el, Ns::None, "wrap")?,
            l_ins: r.num_attr(el, Ns::None, "lIns")?,
            t_ins: r.num_attr(el, Ns::None, "tIns")?,
            r_ins: r.num_attr(el, Ns::None, "rIns")?,
            b_ins: r.num_attr(el, Ns::None, "bIns")?,
            anchor: r.enum_attr(el, Ns::None, "anchor")?,
            anchor_ctr: r.bool_attr(el, Ns::None, "anchorCtr")?,
            upright: r.bool_attr(el, Ns::None, "upright")?,
            autofit: None,
        };

        r.children(el, |r, child| {
            let fit = match (child.ns, child.local()) {
                (Ns::A, b"noAutofit") => Autofit::None,
                (Ns::A, b"normAutofit") => Autofit::Normal,
                (Ns::A, b"spAutoFit") => Autofit::Shape,
                _ => return Ok(false),
            };
            match body.autofit {
                Some(kept) => r.choice_conflict(el, kept.tag(), fit.tag()),
                None => body.autofit = Some(fit),
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(body)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("wps:bodyPr");
        elem.opt_attr("rot", self.rot)
            .opt_attr("vert", self.vert.as_ref().map(XmlEnum::as_str))
            .opt_attr("wrap", self.wrap.as_ref().map(XmlEnum::as_str))
            .opt_attr("lIns", self.l_ins)
            .opt_attr("tIns", self.t_ins)
            .opt_attr("rIns", self.r_ins)
            .opt_attr("bIns", self.b_ins)
            .opt_attr("anchor", self.anchor.as_ref().map(XmlEnum::as_str))
            .bool_attr("anchorCtr", self.anchor_ctr)
            .bool_attr("upright", self.upright);

        match self.autofit {
            Some(fit) => {
                writer::start(writer, elem)?;
                writer::empty(writer, BytesStart::new(fit.tag()))?;
                writer::end(writer, "wps:bodyPr")
            }
            None => writer::empty(writer, elem),
        }
    }
}

/// `wps:wsp`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WpsShape {
    /// `wps:cNvPr`, present when the shape sits inside a group
    pub c_nv_pr: Option<NonVisualProps>,
    /// `wps:cNvSpPr@txBox`
    pub text_box: OptBool,
    /// `wps:cNvSpPr/a:spLocks`
    pub locks: Option<ShapeLocks>,
    pub sp_pr: ShapeProperties,
    /// `wps:txbx`, text box content kept verbatim
    pub text_box_content: Option<RawXmlElement>,
    pub body_pr: BodyProperties,
}

impl WpsShape {
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut shape = Self::default();

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::Wps, b"cNvPr") => shape.c_nv_pr = Some(NonVisualProps::decode(r, child)?),
                (Ns::Wps, b"cNvSpPr") => {
                    shape.text_box = r.bool_attr(child, Ns::None, "txBox")?;
                    r.children(child, |r, c| {
                        if (c.ns, c.local()) == (Ns::A, b"spLocks".as_slice()) {
                            shape.locks = Some(ShapeLocks::decode(r, c)?);
                        }
                        Ok(false)
                    })?;
                }
                (Ns::Wps, b"spPr") => shape.sp_pr = ShapeProperties::decode(r, child)?,
                (Ns::Wps, b"txbx") => shape.text_box_content = Some(RawXmlElement::read(r, child)?),
                (Ns::Wps, b"bodyPr") => shape.body_pr = BodyProperties::decode(r, child)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(shape)
    }

    /// Children in schema order: cNvPr, cNvSpPr, spPr, txbx, bodyPr
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer::start(writer, BytesStart::new("wps:wsp"))?;

        if let Some(c_nv_pr) = &self.c_nv_pr {
            c_nv_pr.write_to(writer, "wps:cNvPr")?;
        }
        let mut c_nv_sp_pr = BytesStart::new("wps:cNvSpPr");
        c_nv_sp_pr.bool_attr("txBox", self.text_box);
        match &self.locks {
            Some(locks) => {
                writer::start(writer, c_nv_sp_pr)?;
                locks.write_to(writer, "a:spLocks")?;
                writer::end(writer, "wps:cNvSpPr")?;
            }
            None => writer::empty(writer, c_nv_sp_pr)?,
        }
        self.sp_pr.write_to(writer, "wps:spPr")?;
        if let Some(txbx) = &self.text_box_content {
            txbx.write_to(writer)?;
        }
        self.body_pr.write_to(writer)?;

        writer::end(writer, "wps:wsp")
    }
}
