//! Picture element (`pic:pic`)

use crate::drawing::shape_props::{Geometry, PresetGeometry, ShapeProperties};
use crate::drawing::types::{NonVisualProps, PicLocks, RelativeRect, Transform2D};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, OptBool, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// Extension URI carrying `a14:useLocalDpi`
pub const USE_LOCAL_DPI_EXT: &str = "{28A0092B-C50C-407E-A947-70E740481C1C}";

/// `pic:pic`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Picture {
    /// `pic:nvPicPr/pic:cNvPr`
    pub c_nv_pr: NonVisualProps,
    /// `pic:cNvPicPr@preferRelativeResize`
    pub prefer_relative_resize: OptBool,
    /// `pic:cNvPicPr/a:picLocks`
    pub locks: Option<PicLocks>,
    pub blip_fill: BlipFill,
    pub sp_pr: ShapeProperties,
}

/// `pic:blipFill`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlipFill {
    pub dpi: Option<u32>,
    pub rot_with_shape: OptBool,
    pub blip: Option<Blip>,
    pub src_rect: Option<RelativeRect>,
    pub mode: Option<FillMode>,
}

/// `a:blip`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blip {
    /// `r:embed`, relationship to an image part
    pub embed: Option<String>,
    /// `r:link`, relationship to an external image
    pub link: Option<String>,
    pub cstate: Option<String>,
    /// `a:extLst/a:ext`
    pub extensions: Vec<BlipExtension>,
}

/// `a:ext` inside a blip
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlipExtension {
    pub uri: String,
    /// `a14:useLocalDpi@val`
    pub use_local_dpi: OptBool,
}

/// Blip fill mode choice
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FillMode {
    /// `a:stretch`, optionally with `a:fillRect`
    Stretch(Option<RelativeRect>),
    /// `a:tile`
    Tile(Tile),
}

/// `a:tile`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    pub tx: Option<i64>,
    pub ty: Option<i64>,
    pub sx: Option<i64>,
    pub sy: Option<i64>,
    pub flip: Option<String>,
    pub algn: Option<String>,
}

impl Picture {
    /// Picture referencing an embedded image, sized in EMUs
    pub fn embedded(r_id: impl Into<String>, cx: i64, cy: i64, id: u32, name: &str) -> Self {
        Self {
            c_nv_pr: NonVisualProps::new(id, name),
            prefer_relative_resize: OptBool::UNSET,
            locks: Some(PicLocks {
                no_change_aspect: OptBool::TRUE,
                ..Default::default()
            }),
            blip_fill: BlipFill {
                blip: Some(Blip {
                    embed: Some(r_id.into()),
                    ..Default::default()
                }),
                mode: Some(FillMode::Stretch(Some(RelativeRect::default()))),
                ..Default::default()
            },
            sp_pr: ShapeProperties {
                xfrm: Some(Transform2D::sized(cx, cy)),
                geometry: Some(Geometry::Preset(PresetGeometry::rect())),
                ..Default::default()
            },
        }
    }

    /// Relationship id of the embedded image
    pub fn embed_id(&self) -> Option<&str> {
        self.blip_fill.blip.as_ref()?.embed.as_deref()
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut pic = Self::default();

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::Pic, b"nvPicPr") => r.children(child, |r, nv| {
                    match (nv.ns, nv.local()) {
                        (Ns::Pic, b"cNvPr") => pic.c_nv_pr = NonVisualProps::decode(r, nv)?,
                        (Ns::Pic, b"cNvPicPr") => {
                            pic.prefer_relative_resize =
                                r.bool_attr(nv, Ns::None, "preferRelativeResize")?;
                            r.children(nv, |r, c| {
                                if (c.ns, c.local()) == (Ns::A, b"picLocks".as_slice()) {
                                    pic.locks = Some(PicLocks::decode(r, c)?);
                                }
                                Ok(false)
                            })?;
                        }
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?,
                (Ns::Pic, b"blipFill") => pic.blip_fill = BlipFill::decode(r, child)?,
                (Ns::Pic, b"spPr") => pic.sp_pr = ShapeProperties::decode(r, child)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(pic)
    }

    /// Children in schema order: nvPicPr, blipFill, spPr
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("pic:pic");
        elem.attr("xmlns:pic", crate::xml::PIC);
        writer::start(writer, elem)?;

        writer::start(writer, BytesStart::new("pic:nvPicPr"))?;
        self.c_nv_pr.write_to(writer, "pic:cNvPr")?;
        let mut c_nv_pic_pr = BytesStart::new("pic:cNvPicPr");
        c_nv_pic_pr.bool_attr("preferRelativeResize", self.prefer_relative_resize);
        match &self.locks {
            Some(locks) => {
                writer::start(writer, c_nv_pic_pr)?;
                locks.write_to(writer, "a:picLocks")?;
                writer::end(writer, "pic:cNvPicPr")?;
            }
            None => writer::empty(writer, c_nv_pic_pr)?,
        }
        writer::end(writer, "pic:nvPicPr")?;

        self.blip_fill.write_to(writer)?;
        self.sp_pr.write_to(writer, "pic:spPr")?;

        writer::end(writer, "pic:pic")
    }
}

impl BlipFill {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut fill = Self {
            dpi: r.num_attr(el, Ns::None, "dpi")?,
            rot_with_shape: r.bool_attr(el, Ns::None, "rotWithShape")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::A, b"blip") => fill.blip = Some(Blip::decode(r, child)?),
                (Ns::A, b"srcRect") => {
                    fill.src_rect = Some(RelativeRect::decode(r, child)?);
                    r.skip(child)?;
                }
                (Ns::A, b"stretch") | (Ns::A, b"tile") => {
                    let mode = if child.local() == b"tile" {
                        let tile = Tile {
                            tx: r.num_attr(child, Ns::None, "tx")?,
                            ty: r.num_attr(child, Ns::None, "ty")?,
                            sx: r.num_attr(child, Ns::None, "sx")?,
                            sy: r.num_attr(child, Ns::None, "sy")?,
                            flip: child.string(Ns::None, "flip"),
                            algn: child.string(Ns::None, "algn"),
                        };
                        r.skip(child)?;
                        FillMode::Tile(tile)
                    } else {
                        let mut rect = None;
                        r.children(child, |r, c| {
                            if (c.ns, c.local()) == (Ns::A, b"fillRect".as_slice()) {
                                rect = Some(RelativeRect::decode(r, c)?);
                            }
                            Ok(false)
                        })?;
                        FillMode::Stretch(rect)
                    };
                    if fill.mode.is_some() {
                        r.choice_conflict(el, "fill mode", &child.name());
                    } else {
                        fill.mode = Some(mode);
                    }
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(fill)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("pic:blipFill");
        elem.opt_attr("dpi", self.dpi)
            .bool_attr("rotWithShape", self.rot_with_shape);
        writer::start(writer, elem)?;

        if let Some(blip) = &self.blip {
            blip.write_to(writer)?;
        }
        if let Some(rect) = &self.src_rect {
            rect.write_to(writer, "a:srcRect")?;
        }
        match &self.mode {
            Some(FillMode::Stretch(rect)) => {
                writer::start(writer, BytesStart::new("a:stretch"))?;
                if let Some(rect) = rect {
                    rect.write_to(writer, "a:fillRect")?;
                }
                writer::end(writer, "a:stretch")?;
            }
            Some(FillMode::Tile(tile)) => {
                let mut elem = BytesStart::new("a:tile");
                elem.opt_attr("tx", tile.tx)
                    .opt_attr("ty", tile.ty)
                    .opt_attr("sx", tile.sx)
                    .opt_attr("sy", tile.sy)
                    .opt_attr("flip", tile.flip.as_ref())
                    .opt_attr("algn", tile.algn.as_ref());
                writer::empty(writer, elem)?;
            }
            None => {}
        }

        writer::end(writer, "pic:blipFill")
    }
}

impl Blip {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut blip = Self {
            embed: el.string(Ns::R, "embed"),
            link: el.string(Ns::R, "link"),
            cstate: el.string(Ns::None, "cstate"),
            extensions: Vec::new(),
        };

        r.children(el, |r, child| {
            if (child.ns, child.local()) != (Ns::A, b"extLst".as_slice()) {
                return Ok(false);
            }
            r.children(child, |r, ext| {
                if (ext.ns, ext.local()) != (Ns::A, b"ext".as_slice()) {
                    return Ok(false);
                }
                let mut extension = BlipExtension {
                    uri: ext.string(Ns::None, "uri").unwrap_or_default(),
                    use_local_dpi: OptBool::UNSET,
                };
                r.children(ext, |r, c| {
                    if (c.ns, c.local()) == (Ns::A14, b"useLocalDpi".as_slice()) {
                        extension.use_local_dpi = r.bool_attr(c, Ns::None, "val")?;
                    }
                    Ok(false)
                })?;
                blip.extensions.push(extension);
                Ok(true)
            })?;
            Ok(true)
        })?;

        Ok(blip)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("a:blip");
        elem.opt_attr("r:embed", self.embed.as_ref())
            .opt_attr("r:link", self.link.as_ref())
            .opt_attr("cstate", self.cstate.as_ref());
        if self.extensions.is_empty() {
            return writer::empty(writer, elem);
        }

        writer::start(writer, elem)?;
        writer::start(writer, BytesStart::new("a:extLst"))?;
        for ext in &self.extensions {
            let mut e = BytesStart::new("a:ext");
            e.attr("uri", &ext.uri);
            writer::start(writer, e)?;
            if ext.use_local_dpi.is_set() {
                let mut dpi = BytesStart::new("a14:useLocalDpi");
                dpi.attr("xmlns:a14", crate::xml::A14)
                    .bool_attr("val", ext.use_local_dpi);
                writer::empty(writer, dpi)?;
            }
            writer::end(writer, "a:ext")?;
        }
        writer::end(writer, "a:extLst")?;
        writer::end(writer, "a:blip")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    const PIC: &str = r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"
        xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
        xmlns:a14="http://schemas.microsoft.com/office/drawing/2010/main"
        xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
      <pic:nvPicPr>
        <pic:cNvPr id="0" name="Picture 1" descr="logo"/>
        <pic:cNvPicPr><a:picLocks noChangeAspect="1" noChangeArrowheads="1"/></pic:cNvPicPr>
      </pic:nvPicPr>
      <pic:blipFill rotWithShape="1">
        <a:blip r:embed="rId5" cstate="print">
          <a:extLst><a:ext uri="{28A0092B-C50C-407E-A947-70E740481C1C}"><a14:useLocalDpi val="0"/></a:ext></a:extLst>
        </a:blip>
        <a:srcRect l="10" r="20"/>
        <a:stretch><a:fillRect/></a:stretch>
      </pic:blipFill>
      <pic:spPr bwMode="auto"><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></pic:spPr>
    </pic:pic>"#;

    #[test]
    fn test_decode_picture() {
        let mut r = PartReader::from_bytes("/pic.xml", PIC.as_bytes(), false);
        let pic = r
            .read_root((Ns::Pic, b"pic"), |r, el| Picture::decode(r, el))
            .unwrap();

        assert_eq!(pic.c_nv_pr.name, "Picture 1");
        assert_eq!(pic.c_nv_pr.descr.as_deref(), Some("logo"));
        let locks = pic.locks.unwrap();
        assert!(locks.no_change_aspect.is_true());
        assert!(locks.no_change_arrowheads.is_true());
        assert!(!locks.no_crop.is_set());

        assert_eq!(pic.embed_id(), Some("rId5"));
        let blip = pic.blip_fill.blip.as_ref().unwrap();
        assert_eq!(blip.cstate.as_deref(), Some("print"));
        assert_eq!(blip.extensions[0].uri, USE_LOCAL_DPI_EXT);
        assert_eq!(blip.extensions[0].use_local_dpi, OptBool::FALSE);
        assert_eq!(pic.blip_fill.src_rect.unwrap().r, Some(20));
        assert_eq!(
            pic.blip_fill.mode,
            Some(FillMode::Stretch(Some(RelativeRect::default())))
        );
    }

    #[test]
    fn test_encode_schema_order() {
        let pic = Picture::embedded("rId9", 100, 200, 1, "image1.png");
        let xml = to_xml_string(|w| pic.write_to(w)).unwrap();

        let nv = xml.find("<pic:nvPicPr>").unwrap();
        let fill = xml.find("<pic:blipFill>").unwrap();
        let sp = xml.find("<pic:spPr>").unwrap();
        assert!(nv < fill && fill < sp);
        assert!(xml.contains(r#"<a:blip r:embed="rId9"/>"#));
        assert!(xml.contains(r#"<a:picLocks noChangeAspect="1"/>"#));
    }
}
