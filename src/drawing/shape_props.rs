//! Shape properties (`a:spPr` family): transform, geometry, fill and outline

use crate::drawing::types::{SrgbColor, Transform2D};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, Element, Ns, OptBool, PartReader, RawXmlElement, XmlEnum};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `ST_BlackWhiteMode`
    pub enum BlackWhiteMode {
        Color => "clr",
        Auto => "auto",
        Gray => "gray",
        LightGray => "ltGray",
        InverseGray => "invGray",
        GrayWhite => "grayWhite",
        BlackGray => "blackGray",
        BlackWhite => "blackWhite",
        Black => "black",
        White => "white",
        Hidden => "hidden",
    }
}

/// Shape geometry choice
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Geometry {
    /// `a:prstGeom`
    Preset(PresetGeometry),
    /// `a:custGeom`, kept verbatim
    Custom(RawXmlElement),
}

/// `a:prstGeom`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetGeometry {
    /// Preset name such as `rect`
    pub prst: String,
    /// Adjust values (`a:avLst/a:gd`)
    pub guides: Vec<GeomGuide>,
}

impl PresetGeometry {
    pub fn rect() -> Self {
        Self {
            prst: "rect".into(),
            guides: Vec::new(),
        }
    }
}

/// `a:gd`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeomGuide {
    pub name: String,
    pub fmla: String,
}

/// Fill choice
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    /// `a:noFill`
    NoFill,
    /// `a:solidFill`
    Solid(SrgbColor),
    /// `a:gradFill`
    Gradient(GradientFill),
}

impl Fill {
    fn tag(&self) -> &'static str {
        match self {
            Fill::NoFill => "noFill",
            Fill::Solid(_) => "solidFill",
            Fill::Gradient(_) => "gradFill",
        }
    }

    /// Decode a fill member if `child` is one
    fn decode<R: BufRead>(r: &mut PartReader<R>, child: &Element<'_>) -> Result<Option<Self>> {
        Ok(Some(match (child.ns, child.local()) {
            (Ns::A, b"noFill") => {
                r.skip(child)?;
                Fill::NoFill
            }
            (Ns::A, b"solidFill") => {
                let mut color = None;
                r.children(child, |r, c| {
                    if (c.ns, c.local()) == (Ns::A, b"srgbClr".as_slice()) {
                        color = Some(SrgbColor::decode(r, c)?);
                        return Ok(true);
                    }
                    Ok(false)
                })?;
                Fill::Solid(color.unwrap_or_default())
            }
            (Ns::A, b"gradFill") => Fill::Gradient(GradientFill::decode(r, child)?),
            _ => return Ok(None),
        }))
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            Fill::NoFill => writer::empty(writer, BytesStart::new("a:noFill")),
            Fill::Solid(color) => {
                writer::start(writer, BytesStart::new("a:solidFill"))?;
                color.write_to(writer)?;
                writer::end(writer, "a:solidFill")
            }
            Fill::Gradient(grad) => grad.write_to(writer),
        }
    }
}

/// `a:gradFill`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GradientFill {
    pub rot_with_shape: OptBool,
    /// `a:gsLst`
    pub stops: Vec<GradientStop>,
    /// `a:lin`
    pub linear: Option<LinearShade>,
}

/// `a:gs`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GradientStop {
    /// Position in 1000ths of a percent
    pub pos: i64,
    pub color: SrgbColor,
}

/// `a:lin`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearShade {
    /// Angle in 60000ths of a degree
    pub ang: i64,
    pub scaled: OptBool,
}

impl GradientFill {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut grad = Self {
            rot_with_shape: r.bool_attr(el, Ns::None, "rotWithShape")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::A, b"gsLst") => r.children(child, |r, gs| {
                    if (gs.ns, gs.local()) != (Ns::A, b"gs".as_slice()) {
                        return Ok(false);
                    }
                    let mut stop = GradientStop {
                        pos: r.num_attr(gs, Ns::None, "pos")?.unwrap_or(0),
                        ..Default::default()
                    };
                    r.children(gs, |r, c| {
                        if (c.ns, c.local()) == (Ns::A, b"srgbClr".as_slice()) {
                            stop.color = SrgbColor::decode(r, c)?;
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                    grad.stops.push(stop);
                    Ok(true)
                })?,
                (Ns::A, b"lin") => {
                    grad.linear = Some(LinearShade {
                        ang: r.num_attr(child, Ns::None, "ang")?.unwrap_or(0),
                        scaled: r.bool_attr(child, Ns::None, "scaled")?,
                    });
                    r.skip(child)?;
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(grad)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("a:gradFill");
        elem.bool_attr("rotWithShape", self.rot_with_shape);
        writer::start(writer, elem)?;

        if !self.stops.is_empty() {
            writer::start(writer, BytesStart::new("a:gsLst"))?;
            for stop in &self.stops {
                let mut gs = BytesStart::new("a:gs");
                gs.attr("pos", stop.pos);
                writer::start(writer, gs)?;
                stop.color.write_to(writer)?;
                writer::end(writer, "a:gs")?;
            }
            writer::end(writer, "a:gsLst")?;
        }

        if let Some(lin) = &self.linear {
            let mut elem = BytesStart::new("a:lin");
            elem.attr("ang", lin.ang).bool_attr("scaled", lin.scaled);
            writer::empty(writer, elem)?;
        }

        writer::end(writer, "a:gradFill")
    }
}

/// `a:ln`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineProperties {
    /// Width in EMUs
    pub w: Option<i64>,
    pub fill: Option<Fill>,
}

impl LineProperties {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut line = Self {
            w: r.num_attr(el, Ns::None, "w")?,
            fill: None,
        };
        r.children(el, |r, child| match Fill::decode(r, child)? {
            Some(fill) => {
                set_fill(r, el, &mut line.fill, fill);
                Ok(true)
            }
            None => Ok(false),
        })?;
        Ok(line)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("a:ln");
        elem.opt_attr("w", self.w);
        match &self.fill {
            Some(fill) => {
                writer::start(writer, elem)?;
                fill.write_to(writer)?;
                writer::end(writer, "a:ln")
            }
            None => writer::empty(writer, elem),
        }
    }
}

/// Keep the first fill seen and report any later one
fn set_fill<R: BufRead>(r: &PartReader<R>, el: &Element<'_>, slot: &mut Option<Fill>, fill: Fill) {
    match slot {
        Some(kept) => r.choice_conflict(el, kept.tag(), fill.tag()),
        None => *slot = Some(fill),
    }
}

/// Shape properties (`pic:spPr`, `wps:spPr`)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeProperties {
    pub bw_mode: Option<BlackWhiteMode>,
    pub xfrm: Option<Transform2D>,
    pub geometry: Option<Geometry>,
    pub fill: Option<Fill>,
    pub line: Option<LineProperties>,
}

impl ShapeProperties {
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut props = Self {
            bw_mode: r.enum_attr(el, Ns::None, "bwMode")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::A, b"xfrm") => props.xfrm = Some(Transform2D::decode(r, child)?),
                (Ns::A, b"prstGeom") | (Ns::A, b"custGeom") => {
                    let geometry = decode_geometry(r, child)?;
                    if props.geometry.is_some() {
                        r.choice_conflict(el, "geometry", &child.name());
                    } else {
                        props.geometry = Some(geometry);
                    }
                }
                (Ns::A, b"ln") => props.line = Some(LineProperties::decode(r, child)?),
                _ => match Fill::decode(r, child)? {
                    Some(fill) => set_fill(r, el, &mut props.fill, fill),
                    None => return Ok(false),
                },
            }
            Ok(true)
        })?;

        Ok(props)
    }

    /// Children in schema order: xfrm, geometry, fill, ln
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.opt_attr("bwMode", self.bw_mode.as_ref().map(XmlEnum::as_str));
        writer::start(writer, elem)?;

        if let Some(xfrm) = &self.xfrm {
            xfrm.write_to(writer)?;
        }
        match &self.geometry {
            Some(Geometry::Preset(preset)) => {
                let mut prst = BytesStart::new("a:prstGeom");
                prst.attr("prst", &preset.prst);
                writer::start(writer, prst)?;
                if preset.guides.is_empty() {
                    writer::empty(writer, BytesStart::new("a:avLst"))?;
                } else {
                    writer::start(writer, BytesStart::new("a:avLst"))?;
                    for gd in &preset.guides {
                        let mut elem = BytesStart::new("a:gd");
                        elem.attr("name", &gd.name).attr("fmla", &gd.fmla);
                        writer::empty(writer, elem)?;
                    }
                    writer::end(writer, "a:avLst")?;
                }
                writer::end(writer, "a:prstGeom")?;
            }
            Some(Geometry::Custom(raw)) => raw.write_to(writer)?,
            None => {}
        }
        if let Some(fill) = &self.fill {
            fill.write_to(writer)?;
        }
        if let Some(line) = &self.line {
            line.write_to(writer)?;
        }

        writer::end(writer, name)
    }
}

fn decode_geometry<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Geometry> {
    if el.local() == b"custGeom" {
        return Ok(Geometry::Custom(RawXmlElement::read(r, el)?));
    }

    let mut preset = PresetGeometry {
        prst: el.string(Ns::None, "prst").unwrap_or_else(|| "rect".into()),
        guides: Vec::new(),
    };
    r.children(el, |r, child| {
        if (child.ns, child.local()) != (Ns::A, b"avLst".as_slice()) {
            return Ok(false);
        }
        r.children(child, |_, gd| {
            if (gd.ns, gd.local()) == (Ns::A, b"gd".as_slice()) {
                preset.guides.push(GeomGuide {
                    name: gd.string(Ns::None, "name").unwrap_or_default(),
                    fmla: gd.string(Ns::None, "fmla").unwrap_or_default(),
                });
            }
            Ok(false)
        })?;
        Ok(true)
    })?;
    Ok(Geometry::Preset(preset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::types::PositiveSize2D;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    fn decode(xml: &str) -> ShapeProperties {
        let mut r = PartReader::from_bytes("/s.xml", xml.as_bytes(), false);
        r.read_root((Ns::Pic, b"spPr"), |r, el| ShapeProperties::decode(r, el))
            .unwrap()
    }

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#;

    #[test]
    fn test_decode_gradient_and_line() {
        let props = decode(&format!(
            r#"<pic:spPr {NS} bwMode="auto">
                 <a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="50"/></a:xfrm>
                 <a:prstGeom prst="roundRect"><a:avLst><a:gd name="adj" fmla="val 1000"/></a:avLst></a:prstGeom>
                 <a:gradFill rotWithShape="1">
                   <a:gsLst><a:gs pos="0"><a:srgbClr val="FF0000"/></a:gs><a:gs pos="100000"><a:srgbClr val="0000FF"/></a:gs></a:gsLst>
                   <a:lin ang="5400000" scaled="0"/>
                 </a:gradFill>
                 <a:ln w="9525"><a:noFill/></a:ln>
               </pic:spPr>"#
        ));

        assert_eq!(props.bw_mode, Some(BlackWhiteMode::Auto));
        assert_eq!(
            props.xfrm.as_ref().and_then(|x| x.ext),
            Some(PositiveSize2D::new(100, 50))
        );
        match &props.geometry {
            Some(Geometry::Preset(p)) => {
                assert_eq!(p.prst, "roundRect");
                assert_eq!(p.guides[0].fmla, "val 1000");
            }
            other => panic!("unexpected geometry {:?}", other),
        }
        match &props.fill {
            Some(Fill::Gradient(g)) => {
                assert_eq!(g.stops.len(), 2);
                assert_eq!(g.stops[1].color.val, "0000FF");
                assert_eq!(g.linear.unwrap().ang, 5_400_000);
            }
            other => panic!("unexpected fill {:?}", other),
        }
        assert_eq!(props.line.unwrap().fill, Some(Fill::NoFill));
    }

    #[test]
    fn test_second_fill_is_dropped() {
        let props = decode(&format!(
            r#"<pic:spPr {NS}><a:noFill/><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill></pic:spPr>"#
        ));
        assert_eq!(props.fill, Some(Fill::NoFill));
    }

    #[test]
    fn test_encode_schema_order() {
        let props = ShapeProperties {
            line: Some(LineProperties::default()),
            fill: Some(Fill::NoFill),
            geometry: Some(Geometry::Preset(PresetGeometry::rect())),
            xfrm: Some(Transform2D::sized(10, 20)),
            bw_mode: None,
        };
        let xml = to_xml_string(|w| props.write_to(w, "pic:spPr")).unwrap();

        let order: Vec<usize> = ["<a:xfrm", "<a:prstGeom", "<a:noFill", "<a:ln"]
            .iter()
            .map(|tag| xml.find(tag).unwrap())
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }
}
