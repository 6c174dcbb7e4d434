//! Inline drawing placement (`wp:inline`)

use crate::drawing::graphic::Graphic;
use crate::drawing::picture::Picture;
use crate::drawing::types::{EffectExtent, GraphicFrameLocks, NonVisualProps, PositiveSize2D};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, LongHexNum, Ns, OptBool, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// `wp:cNvGraphicFramePr`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphicFrameProps {
    /// `a:graphicFrameLocks`
    pub locks: Option<GraphicFrameLocks>,
}

impl GraphicFrameProps {
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut props = Self::default();
        r.children(el, |r, child| {
            if (child.ns, child.local()) == (Ns::A, b"graphicFrameLocks".as_slice()) {
                props.locks = Some(GraphicFrameLocks::decode(r, child)?);
            }
            Ok(false)
        })?;
        Ok(props)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match &self.locks {
            Some(locks) => {
                writer::start(writer, BytesStart::new("wp:cNvGraphicFramePr"))?;
                locks.write_to(writer, "a:graphicFrameLocks")?;
                writer::end(writer, "wp:cNvGraphicFramePr")
            }
            None => writer::empty(writer, BytesStart::new("wp:cNvGraphicFramePr")),
        }
    }
}

/// `wp:inline`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inline {
    pub dist_t: u32,
    pub dist_b: u32,
    pub dist_l: u32,
    pub dist_r: u32,
    /// `wp14:anchorId`
    pub anchor_id: Option<LongHexNum>,
    /// `wp14:editId`
    pub edit_id: Option<LongHexNum>,
    pub extent: PositiveSize2D,
    pub effect_extent: Option<EffectExtent>,
    pub doc_pr: NonVisualProps,
    pub frame_pr: Option<GraphicFrameProps>,
    pub graphic: Graphic,
}

impl Inline {
    /// Inline picture referencing the image relationship `r_id`
    pub fn picture(r_id: impl Into<String>, cx: i64, cy: i64, id: u32, name: &str) -> Self {
        Self {
            extent: PositiveSize2D::new(cx, cy),
            effect_extent: Some(EffectExtent::default()),
            doc_pr: NonVisualProps::new(id, name),
            frame_pr: Some(GraphicFrameProps {
                locks: Some(GraphicFrameLocks {
                    no_change_aspect: OptBool::TRUE,
                    ..Default::default()
                }),
            }),
            graphic: Graphic::picture(Picture::embedded(r_id, cx, cy, 0, name)),
            ..Default::default()
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut inline = Self {
            dist_t: r.num_attr(el, Ns::None, "distT")?.unwrap_or(0),
            dist_b: r.num_attr(el, Ns::None, "distB")?.unwrap_or(0),
            dist_l: r.num_attr(el, Ns::None, "distL")?.unwrap_or(0),
            dist_r: r.num_attr(el, Ns::None, "distR")?.unwrap_or(0),
            anchor_id: r.hex_attr(el, Ns::Wp14, "anchorId")?,
            edit_id: r.hex_attr(el, Ns::Wp14, "editId")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::Wp, b"extent") => {
                    inline.extent = PositiveSize2D::decode(r, child)?;
                    r.skip(child)?;
                }
                (Ns::Wp, b"effectExtent") => {
                    inline.effect_extent = Some(EffectExtent::decode(r, child)?);
                    r.skip(child)?;
                }
                (Ns::Wp, b"docPr") => inline.doc_pr = NonVisualProps::decode(r, child)?,
                (Ns::Wp, b"cNvGraphicFramePr") => {
                    inline.frame_pr = Some(GraphicFrameProps::decode(r, child)?)
                }
                (Ns::A, b"graphic") => inline.graphic = Graphic::decode(r, child)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(inline)
    }

    /// Children in schema order: extent, effectExtent, docPr, cNvGraphicFramePr, graphic
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("wp:inline");
        elem.attr("distT", self.dist_t)
            .attr("distB", self.dist_b)
            .attr("distL", self.dist_l)
            .attr("distR", self.dist_r)
            .opt_attr("wp14:anchorId", self.anchor_id)
            .opt_attr("wp14:editId", self.edit_id);
        writer::start(writer, elem)?;

        self.extent.write_to(writer, "wp:extent")?;
        if let Some(effect) = &self.effect_extent {
            effect.write_to(writer)?;
        }
        self.doc_pr.write_to(writer, "wp:docPr")?;
        if let Some(frame_pr) = &self.frame_pr {
            frame_pr.write_to(writer)?;
        }
        self.graphic.write_to(writer)?;

        writer::end(writer, "wp:inline")
    }
}
