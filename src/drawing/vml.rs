//! Legacy VML graphics (`w:pict`)
//!
//! VML booleans are `t`/`f` strings, so attributes are kept as text.

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// `w:pict`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pict {
    pub shapes: Vec<VmlShape>,
}

/// Child of a pict or VML group
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VmlShape {
    /// `v:shapetype`
    ShapeType(ShapeType),
    /// `v:shape`
    Shape(Shape),
    /// `v:group`
    Group(Group),
    /// `v:rect`
    Rect(Rect),
    /// Other VML or `o:` content kept verbatim
    Other(RawXmlElement),
}

/// `v:group`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group {
    /// `w14:anchorId`
    pub anchor_id: Option<String>,
    pub id: Option<String>,
    /// `o:spid`
    pub spid: Option<String>,
    pub style: Option<String>,
    pub coord_origin: Option<String>,
    pub coord_size: Option<String>,
    /// `o:gfxdata`
    pub gfx_data: Option<String>,
    pub children: Vec<VmlShape>,
}

/// `v:rect`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub id: Option<String>,
    pub spid: Option<String>,
    pub style: Option<String>,
    pub fill_color: Option<String>,
    pub stroked: Option<String>,
    pub gfx_data: Option<String>,
    pub fill: Option<VmlFill>,
}

/// `v:fill`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VmlFill {
    pub color2: Option<String>,
    pub rotate: Option<String>,
    pub angle: Option<String>,
    pub focus: Option<String>,
    pub fill_type: Option<String>,
}

/// `v:shape`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shape {
    pub id: Option<String>,
    pub spid: Option<String>,
    /// Reference to a shapetype, e.g. `#_x0000_t75`
    pub shape_type: Option<String>,
    pub alt: Option<String>,
    pub style: Option<String>,
    pub gfx_data: Option<String>,
    pub image_data: Option<ImageData>,
}

/// `v:imagedata`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageData {
    /// `r:id`
    pub r_id: Option<String>,
    /// `o:title`
    pub title: Option<String>,
}

/// `v:shapetype`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeType {
    pub id: Option<String>,
    pub coord_size: Option<String>,
    /// `o:spt`
    pub spt: Option<String>,
    /// `o:preferrelative`
    pub prefer_relative: Option<String>,
    pub path: Option<String>,
    pub filled: Option<String>,
    pub stroked: Option<String>,
    /// `v:stroke@joinstyle`
    pub stroke_join_style: Option<String>,
    pub formulas: Vec<String>,
    pub path_element: Option<VmlPath>,
    pub lock: Option<VmlLock>,
}

/// `v:path`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VmlPath {
    /// `o:extrusionok`
    pub extrusion_ok: Option<String>,
    pub gradient_shape_ok: Option<String>,
    /// `o:connecttype`
    pub connect_type: Option<String>,
}

/// `o:lock`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VmlLock {
    /// `v:ext`
    pub ext: Option<String>,
    pub aspect_ratio: Option<String>,
}

impl Pict {
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        Ok(Self {
            shapes: decode_shapes(r, el)?,
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer::start(writer, BytesStart::new("w:pict"))?;
        write_shapes(writer, &self.shapes)?;
        writer::end(writer, "w:pict")
    }

    /// Image relationship ids referenced by `v:imagedata`
    pub fn image_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        collect_image_ids(&self.shapes, &mut ids);
        ids
    }
}

fn collect_image_ids<'a>(shapes: &'a [VmlShape], ids: &mut Vec<&'a str>) {
    for shape in shapes {
        match shape {
            VmlShape::Shape(s) => {
                if let Some(id) = s.image_data.as_ref().and_then(|d| d.r_id.as_deref()) {
                    ids.push(id);
                }
            }
            VmlShape::Group(g) => collect_image_ids(&g.children, ids),
            _ => {}
        }
    }
}

fn decode_shapes<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Vec<VmlShape>> {
    let mut shapes = Vec::new();
    r.children(el, |r, child| {
        let shape = match (child.ns, child.local()) {
            (Ns::V, b"shapetype") => VmlShape::ShapeType(ShapeType::decode(r, child)?),
            (Ns::V, b"shape") => VmlShape::Shape(Shape::decode(r, child)?),
            (Ns::V, b"group") => VmlShape::Group(Group::decode(r, child)?),
            (Ns::V, b"rect") => VmlShape::Rect(Rect::decode(r, child)?),
            (Ns::V, _) | (Ns::O, _) => VmlShape::Other(RawXmlElement::read(r, child)?),
            _ => return Ok(false),
        };
        shapes.push(shape);
        Ok(true)
    })?;
    Ok(shapes)
}

fn write_shapes<W: Write>(writer: &mut Writer<W>, shapes: &[VmlShape]) -> Result<()> {
    for shape in shapes {
        match shape {
            VmlShape::ShapeType(t) => t.write_to(writer)?,
            VmlShape::Shape(s) => s.write_to(writer)?,
            VmlShape::Group(g) => g.write_to(writer)?,
            VmlShape::Rect(rect) => rect.write_to(writer)?,
            VmlShape::Other(raw) => raw.write_to(writer)?,
        }
    }
    Ok(())
}

/// Write `elem` as empty when there is no content, else wrap `body`
fn write_container<W: Write, F>(
    writer: &mut Writer<W>,
    elem: BytesStart<'_>,
    name: &str,
    has_content: bool,
    body: F,
) -> Result<()>
where
    F: FnOnce(&mut Writer<W>) -> Result<()>,
{
    if !has_content {
        return writer::empty(writer, elem);
    }
    writer::start(writer, elem)?;
    body(writer)?;
    writer::end(writer, name)
}

impl Group {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        Ok(Self {
            anchor_id: el.string(Ns::W14, "anchorId"),
            id: el.string(Ns::None, "id"),
            spid: el.string(Ns::O, "spid"),
            style: el.string(Ns::None, "style"),
            coord_origin: el.string(Ns::None, "coordorigin"),
            coord_size: el.string(Ns::None, "coordsize"),
            gfx_data: el.string(Ns::O, "gfxdata"),
            children: decode_shapes(r, el)?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("v:group");
        elem.opt_attr("w14:anchorId", self.anchor_id.as_ref())
            .opt_attr("id", self.id.as_ref())
            .opt_attr("o:spid", self.spid.as_ref())
            .opt_attr("style", self.style.as_ref())
            .opt_attr("coordorigin", self.coord_origin.as_ref())
            .opt_attr("coordsize", self.coord_size.as_ref())
            .opt_attr("o:gfxdata", self.gfx_data.as_ref());
        write_container(writer, elem, "v:group", !self.children.is_empty(), |w| {
            write_shapes(w, &self.children)
        })
    }
}

impl Rect {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut rect = Self {
            id: el.string(Ns::None, "id"),
            spid: el.string(Ns::O, "spid"),
            style: el.string(Ns::None, "style"),
            fill_color: el.string(Ns::None, "fillcolor"),
            stroked: el.string(Ns::None, "stroked"),
            gfx_data: el.string(Ns::O, "gfxdata"),
            fill: None,
        };
        r.children(el, |_, child| {
            if (child.ns, child.local()) == (Ns::V, b"fill".as_slice()) {
                rect.fill = Some(VmlFill {
                    color2: child.string(Ns::None, "color2"),
                    rotate: child.string(Ns::None, "rotate"),
                    angle: child.string(Ns::None, "angle"),
                    focus: child.string(Ns::None, "focus"),
                    fill_type: child.string(Ns::None, "type"),
                });
            }
            Ok(false)
        })?;
        Ok(rect)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("v:rect");
        elem.opt_attr("id", self.id.as_ref())
            .opt_attr("o:spid", self.spid.as_ref())
            .opt_attr("style", self.style.as_ref())
            .opt_attr("fillcolor", self.fill_color.as_ref())
            .opt_attr("stroked", self.stroked.as_ref())
            .opt_attr("o:gfxdata", self.gfx_data.as_ref());
        write_container(writer, elem, "v:rect", self.fill.is_some(), |w| {
            if let Some(fill) = &self.fill {
                let mut f = BytesStart::new("v:fill");
                f.opt_attr("color2", fill.color2.as_ref())
                    .opt_attr("rotate", fill.rotate.as_ref())
                    .opt_attr("angle", fill.angle.as_ref())
                    .opt_attr("focus", fill.focus.as_ref())
                    .opt_attr("type", fill.fill_type.as_ref());
                writer::empty(w, f)?;
            }
            Ok(())
        })
    }
}

impl Shape {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut shape = Self {
            id: el.string(Ns::None, "id"),
            spid: el.string(Ns::O, "spid"),
            shape_type: el.string(Ns::None, "type"),
            alt: el.string(Ns::None, "alt"),
            style: el.string(Ns::None, "style"),
            gfx_data: el.string(Ns::O, "gfxdata"),
            image_data: None,
        };
        r.children(el, |_, child| {
            if (child.ns, child.local()) == (Ns::V, b"imagedata".as_slice()) {
                shape.image_data = Some(ImageData {
                    r_id: child.string(Ns::R, "id"),
                    title: child.string(Ns::O, "title"),
                });
            }
            Ok(false)
        })?;
        Ok(shape)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("v:shape");
        elem.opt_attr("id", self.id.as_ref())
            .opt_attr("o:spid", self.spid.as_ref())
            .opt_attr("type", self.shape_type.as_ref())
            .opt_attr("alt", self.alt.as_ref())
            .opt_attr("style", self.style.as_ref())
            .opt_attr("o:gfxdata", self.gfx_data.as_ref());
        write_container(writer, elem, "v:shape", self.image_data.is_some(), |w| {
            if let Some(data) = &self.image_data {
                let mut img = BytesStart::new("v:imagedata");
                img.opt_attr("r:id", data.r_id.as_ref())
                    .opt_attr("o:title", data.title.as_ref());
                writer::empty(w, img)?;
            }
            Ok(())
        })
    }
}

impl ShapeType {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut st = Self {
            id: el.string(Ns::None, "id"),
            coord_size: el.string(Ns::None, "coordsize"),
            spt: el.string(Ns::O, "spt"),
            prefer_relative: el.string(Ns::O, "preferrelative"),
            path: el.string(Ns::None, "path"),
            filled: el.string(Ns::None, "filled"),
            stroked: el.string(Ns::None, "stroked"),
            ..Default::default()
        };

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::V, b"stroke") => st.stroke_join_style = child.string(Ns::None, "joinstyle"),
                (Ns::V, b"formulas") => {
                    r.children(child, |_, f| {
                        if (f.ns, f.local()) == (Ns::V, b"f".as_slice()) {
                            st.formulas.push(f.string(Ns::None, "eqn").unwrap_or_default());
                        }
                        Ok(false)
                    })?;
                    return Ok(true);
                }
                (Ns::V, b"path") => {
                    st.path_element = Some(VmlPath {
                        extrusion_ok: child.string(Ns::O, "extrusionok"),
                        gradient_shape_ok: child.string(Ns::None, "gradientshapeok"),
                        connect_type: child.string(Ns::O, "connecttype"),
                    })
                }
                (Ns::O, b"lock") => {
                    st.lock = Some(VmlLock {
                        ext: child.string(Ns::V, "ext"),
                        aspect_ratio: child.string(Ns::None, "aspectratio"),
                    })
                }
                _ => {}
            }
            Ok(false)
        })?;

        Ok(st)
    }

    /// Children in schema order: stroke, formulas, path, lock
    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("v:shapetype");
        elem.opt_attr("id", self.id.as_ref())
            .opt_attr("coordsize", self.coord_size.as_ref())
            .opt_attr("o:spt", self.spt.as_ref())
            .opt_attr("o:preferrelative", self.prefer_relative.as_ref())
            .opt_attr("path", self.path.as_ref())
            .opt_attr("filled", self.filled.as_ref())
            .opt_attr("stroked", self.stroked.as_ref());

        let has_content = self.stroke_join_style.is_some()
            || !self.formulas.is_empty()
            || self.path_element.is_some()
            || self.lock.is_some();
        write_container(writer, elem, "v:shapetype", has_content, |w| {
            if let Some(join) = &self.stroke_join_style {
                let mut stroke = BytesStart::new("v:stroke");
                stroke.attr("joinstyle", join);
                writer::empty(w, stroke)?;
            }
            if !self.formulas.is_empty() {
                writer::start(w, BytesStart::new("v:formulas"))?;
                for eqn in &self.formulas {
                    let mut f = BytesStart::new("v:f");
                    f.attr("eqn", eqn);
                    writer::empty(w, f)?;
                }
                writer::end(w, "v:formulas")?;
            }
            if let Some(path) = &self.path_element {
                let mut p = BytesStart::new("v:path");
                p.opt_attr("o:extrusionok", path.extrusion_ok.as_ref())
                    .opt_attr("gradientshapeok", path.gradient_shape_ok.as_ref())
                    .opt_attr("o:connecttype", path.connect_type.as_ref());
                writer::empty(w, p)?;
            }
            if let Some(lock) = &self.lock {
                let mut l = BytesStart::new("o:lock");
                l.opt_attr("v:ext", lock.ext.as_ref())
                    .opt_attr("aspectratio", lock.aspect_ratio.as_ref());
                writer::empty(w, l)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    // Prefixes deliberately differ from the conventional v:/o:
    const PICT: &str = r##"<w:pict xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
        xmlns:vml="urn:schemas-microsoft-com:vml" xmlns:off="urn:schemas-microsoft-com:office:office"
        xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"
        xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
      <vml:shapetype id="_x0000_t75" coordsize="21600,21600" off:spt="75" off:preferrelative="t" path="m@4@5l@4@11@9@11@9@5xe" filled="f" stroked="f">
        <vml:stroke joinstyle="miter"/>
        <vml:formulas><vml:f eqn="if lineDrawn pixelLineWidth 0"/><vml:f eqn="sum @0 1 0"/></vml:formulas>
        <vml:path off:extrusionok="f" gradientshapeok="t" off:connecttype="rect"/>
        <off:lock vml:ext="edit" aspectratio="t"/>
      </vml:shapetype>
      <vml:group w14:anchorId="0A1B2C3D" id="Group 1" off:spid="_x0000_s1026" coordorigin="0,0" coordsize="100,100">
        <vml:rect id="r1" fillcolor="#fff" stroked="f"><vml:fill color2="#000" rotate="t" angle="90" focus="100%" type="gradient"/></vml:rect>
        <vml:shape id="s1" type="#_x0000_t75" alt="logo"><vml:imagedata rel:id="rId8" off:title=""/></vml:shape>
      </vml:group>
    </w:pict>"##;

    fn decode() -> Pict {
        let mut r = PartReader::from_bytes("/v.xml", PICT.as_bytes(), false);
        r.read_root((Ns::W, b"pict"), |r, el| Pict::decode(r, el))
            .unwrap()
    }

    #[test]
    fn test_decode_by_namespace() {
        let pict = decode();
        assert_eq!(pict.shapes.len(), 2);

        match &pict.shapes[0] {
            VmlShape::ShapeType(st) => {
                assert_eq!(st.spt.as_deref(), Some("75"));
                assert_eq!(st.prefer_relative.as_deref(), Some("t"));
                assert_eq!(st.stroke_join_style.as_deref(), Some("miter"));
                assert_eq!(st.formulas.len(), 2);
                assert_eq!(st.path_element.as_ref().unwrap().connect_type.as_deref(), Some("rect"));
                assert_eq!(st.lock.as_ref().unwrap().ext.as_deref(), Some("edit"));
            }
            other => panic!("unexpected {:?}", other),
        }

        match &pict.shapes[1] {
            VmlShape::Group(g) => {
                assert_eq!(g.anchor_id.as_deref(), Some("0A1B2C3D"));
                assert_eq!(g.spid.as_deref(), Some("_x0000_s1026"));
                match &g.children[0] {
                    VmlShape::Rect(rect) => {
                        assert_eq!(rect.fill.as_ref().unwrap().fill_type.as_deref(), Some("gradient"))
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(pict.image_ids(), vec!["rId8"]);
    }

    #[test]
    fn test_encode_uses_canonical_prefixes() {
        let xml = to_xml_string(|w| decode().write_to(w)).unwrap();
        assert!(xml.contains(r#"<v:shapetype id="_x0000_t75" coordsize="21600,21600" o:spt="75""#));
        assert!(xml.contains(r#"<o:lock v:ext="edit" aspectratio="t"/>"#));
        assert!(xml.contains(r#"<v:imagedata r:id="rId8" o:title=""/>"#));
        assert!(xml.contains(r#"<v:group w14:anchorId="0A1B2C3D""#));
    }
}
