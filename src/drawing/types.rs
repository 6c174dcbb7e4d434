//! DrawingML value types shared by anchors, inlines, pictures and shapes

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, OptBool, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// Point in EMUs (`a:off`, `wp:simplePos`, polygon vertices)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point2D {
    pub x: i64,
    pub y: i64,
}

impl Point2D {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub(crate) fn decode<R: BufRead>(r: &PartReader<R>, el: &Element<'_>) -> Result<Self> {
        Ok(Self {
            x: r.num_attr(el, Ns::None, "x")?.unwrap_or(0),
            y: r.num_attr(el, Ns::None, "y")?.unwrap_or(0),
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.attr("x", self.x).attr("y", self.y);
        writer::empty(writer, elem)
    }
}

/// Size in EMUs (`wp:extent`, `a:ext`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositiveSize2D {
    pub cx: i64,
    pub cy: i64,
}

impl PositiveSize2D {
    pub fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }

    pub(crate) fn decode<R: BufRead>(r: &PartReader<R>, el: &Element<'_>) -> Result<Self> {
        Ok(Self {
            cx: r.num_attr(el, Ns::None, "cx")?.unwrap_or(0),
            cy: r.num_attr(el, Ns::None, "cy")?.unwrap_or(0),
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.attr("cx", self.cx).attr("cy", self.cy);
        writer::empty(writer, elem)
    }
}

/// Extra space added around a drawing for effects (`wp:effectExtent`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectExtent {
    pub l: i64,
    pub t: i64,
    pub r: i64,
    pub b: i64,
}

impl EffectExtent {
    pub(crate) fn decode<R: BufRead>(r: &PartReader<R>, el: &Element<'_>) -> Result<Self> {
        Ok(Self {
            l: r.num_attr(el, Ns::None, "l")?.unwrap_or(0),
            t: r.num_attr(el, Ns::None, "t")?.unwrap_or(0),
            r: r.num_attr(el, Ns::None, "r")?.unwrap_or(0),
            b: r.num_attr(el, Ns::None, "b")?.unwrap_or(0),
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("wp:effectExtent");
        elem.attr("l", self.l)
            .attr("t", self.t)
            .attr("r", self.r)
            .attr("b", self.b);
        writer::empty(writer, elem)
    }
}

/// Percentage insets of a rectangle (`a:srcRect`, `a:fillRect`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelativeRect {
    pub l: Option<i64>,
    pub t: Option<i64>,
    pub r: Option<i64>,
    pub b: Option<i64>,
}

impl RelativeRect {
    pub(crate) fn decode<R: BufRead>(r: &PartReader<R>, el: &Element<'_>) -> Result<Self> {
        Ok(Self {
            l: r.num_attr(el, Ns::None, "l")?,
            t: r.num_attr(el, Ns::None, "t")?,
            r: r.num_attr(el, Ns::None, "r")?,
            b: r.num_attr(el, Ns::None, "b")?,
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.opt_attr("l", self.l)
            .opt_attr("t", self.t)
            .opt_attr("r", self.r)
            .opt_attr("b", self.b);
        writer::empty(writer, elem)
    }
}

/// Non-visual drawing properties (`wp:docPr`, `pic:cNvPr`, `wps:cNvPr`)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NonVisualProps {
    pub id: u32,
    pub name: String,
    pub descr: Option<String>,
    pub hidden: OptBool,
    pub title: Option<String>,
}

impl NonVisualProps {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let props = Self {
            id: r.num_attr(el, Ns::None, "id")?.unwrap_or(0),
            name: el.string(Ns::None, "name").unwrap_or_default(),
            descr: el.string(Ns::None, "descr"),
            hidden: r.bool_attr(el, Ns::None, "hidden")?,
            title: el.string(Ns::None, "title"),
        };
        // hlinkClick and extLst are not modelled
        r.skip(el)?;
        Ok(props)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.attr("id", self.id)
            .attr("name", &self.name)
            .opt_attr("descr", self.descr.as_ref())
            .bool_attr("hidden", self.hidden)
            .opt_attr("title", self.title.as_ref());
        writer::empty(writer, elem)
    }
}

/// Declare a lock-flag element: a set of optional boolean attributes
macro_rules! locks {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $attr:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: OptBool,)+
        }

        impl $name {
            pub(crate) fn decode<R: BufRead>(r: &PartReader<R>, el: &Element<'_>) -> Result<Self> {
                Ok(Self {
                    $($field: r.bool_attr(el, Ns::None, $attr)?,)+
                })
            }

            pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
                let mut elem = BytesStart::new(name);
                $(elem.bool_attr($attr, self.$field);)+
                writer::empty(writer, elem)
            }
        }
    };
}

locks! {
    /// `a:graphicFrameLocks`
    GraphicFrameLocks {
        no_grp => "noGrp",
        no_drilldown => "noDrilldown",
        no_select => "noSelect",
        no_change_aspect => "noChangeAspect",
        no_move => "noMove",
        no_resize => "noResize",
    }
}

locks! {
    /// `a:picLocks`
    PicLocks {
        no_grp => "noGrp",
        no_select => "noSelect",
        no_rot => "noRot",
        no_change_aspect => "noChangeAspect",
        no_move => "noMove",
        no_resize => "noResize",
        no_edit_points => "noEditPoints",
        no_adjust_handles => "noAdjustHandles",
        no_change_arrowheads => "noChangeArrowheads",
        no_change_shape_type => "noChangeShapeType",
        no_crop => "noCrop",
    }
}

locks! {
    /// `a:spLocks`
    ShapeLocks {
        no_grp => "noGrp",
        no_select => "noSelect",
        no_rot => "noRot",
        no_change_aspect => "noChangeAspect",
        no_move => "noMove",
        no_resize => "noResize",
        no_edit_points => "noEditPoints",
        no_adjust_handles => "noAdjustHandles",
        no_change_arrowheads => "noChangeArrowheads",
        no_change_shape_type => "noChangeShapeType",
        no_text_edit => "noTextEdit",
    }
}

locks! {
    /// `a:grpSpLocks`
    GroupLocks {
        no_grp => "noGrp",
        no_ungrp => "noUngrp",
        no_select => "noSelect",
        no_rot => "noRot",
        no_change_aspect => "noChangeAspect",
        no_move => "noMove",
        no_resize => "noResize",
    }
}

/// `a:xfrm`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transform2D {
    /// Rotation in 60000ths of a degree
    pub rot: Option<i64>,
    pub flip_h: OptBool,
    pub flip_v: OptBool,
    pub off: Option<Point2D>,
    pub ext: Option<PositiveSize2D>,
    /// Child offset, group transforms only
    pub ch_off: Option<Point2D>,
    /// Child extent, group transforms only
    pub ch_ext: Option<PositiveSize2D>,
}

impl Transform2D {
    /// Transform placing a shape at the origin with the given size
    pub fn sized(cx: i64, cy: i64) -> Self {
        Self {
            off: Some(Point2D::new(0, 0)),
            ext: Some(PositiveSize2D::new(cx, cy)),
            ..Default::default()
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut xfrm = Self {
            rot: r.num_attr(el, Ns::None, "rot")?,
            flip_h: r.bool_attr(el, Ns::None, "flipH")?,
            flip_v: r.bool_attr(el, Ns::None, "flipV")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::A, b"off") => xfrm.off = Some(Point2D::decode(r, child)?),
                (Ns::A, b"ext") => xfrm.ext = Some(PositiveSize2D::decode(r, child)?),
                (Ns::A, b"chOff") => xfrm.ch_off = Some(Point2D::decode(r, child)?),
                (Ns::A, b"chExt") => xfrm.ch_ext = Some(PositiveSize2D::decode(r, child)?),
                _ => return Ok(false),
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(xfrm)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("a:xfrm");
        elem.opt_attr("rot", self.rot)
            .bool_attr("flipH", self.flip_h)
            .bool_attr("flipV", self.flip_v);
        writer::start(writer, elem)?;

        if let Some(off) = &self.off {
            off.write_to(writer, "a:off")?;
        }
        if let Some(ext) = &self.ext {
            ext.write_to(writer, "a:ext")?;
        }
        if let Some(ch_off) = &self.ch_off {
            ch_off.write_to(writer, "a:chOff")?;
        }
        if let Some(ch_ext) = &self.ch_ext {
            ch_ext.write_to(writer, "a:chExt")?;
        }

        writer::end(writer, "a:xfrm")
    }
}

/// `a:srgbClr`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SrgbColor {
    /// RRGGBB
    pub val: String,
    /// Alpha in 1000ths of a percent
    pub alpha: Option<i64>,
}

impl SrgbColor {
    pub fn new(val: impl Into<String>) -> Self {
        Self {
            val: val.into(),
            alpha: None,
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut color = Self::new(el.string(Ns::None, "val").unwrap_or_default());
        r.children(el, |r, child| {
            if (child.ns, child.local()) == (Ns::A, b"alpha".as_slice()) {
                color.alpha = r.num_attr(child, Ns::None, "val")?;
            }
            Ok(false)
        })?;
        Ok(color)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("a:srgbClr");
        elem.attr("val", &self.val);
        match self.alpha {
            Some(alpha) => {
                writer::start(writer, elem)?;
                let mut a = BytesStart::new("a:alpha");
                a.attr("val", alpha);
                writer::empty(writer, a)?;
                writer::end(writer, "a:srgbClr")
            }
            None => writer::empty(writer, elem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;

    const A_NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#;

    #[test]
    fn test_transform_decode() {
        let xml = format!(
            r#"<a:xfrm {A_NS} rot="5400000" flipH="1"><a:ext cx="20" cy="10"/><a:off x="1" y="2"/></a:xfrm>"#
        );
        let mut r = PartReader::from_bytes("/t.xml", xml.as_bytes(), false);
        let xfrm = r
            .read_root((Ns::A, b"xfrm"), |r, el| Transform2D::decode(r, el))
            .unwrap();

        assert_eq!(xfrm.rot, Some(5_400_000));
        assert!(xfrm.flip_h.is_true());
        assert!(!xfrm.flip_v.is_set());
        assert_eq!(xfrm.off, Some(Point2D::new(1, 2)));
        assert_eq!(xfrm.ext, Some(PositiveSize2D::new(20, 10)));
    }

    #[test]
    fn test_transform_encodes_off_before_ext() {
        let xfrm = Transform2D {
            ext: Some(PositiveSize2D::new(5, 6)),
            off: Some(Point2D::new(0, 0)),
            ..Default::default()
        };
        let xml = to_xml_string(|w| xfrm.write_to(w)).unwrap();
        assert_eq!(
            xml,
            r#"<a:xfrm><a:off x="0" y="0"/><a:ext cx="5" cy="6"/></a:xfrm>"#
        );
    }

    #[test]
    fn test_locks_omit_unset_flags() {
        let locks = PicLocks {
            no_change_aspect: OptBool::TRUE,
            no_crop: OptBool::FALSE,
            ..Default::default()
        };
        let xml = to_xml_string(|w| locks.write_to(w, "a:picLocks")).unwrap();
        assert_eq!(xml, r#"<a:picLocks noChangeAspect="1" noCrop="0"/>"#);
    }
}
