//! Graphic frame content (`a:graphic/a:graphicData`)

use crate::drawing::picture::Picture;
use crate::drawing::wpg::WpgGroup;
use crate::drawing::wps::WpsShape;
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// `a:graphic`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graphic {
    pub data: GraphicData,
}

/// `a:graphicData`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphicData {
    pub uri: String,
    pub content: Option<GraphicContent>,
}

/// Payload of a graphic frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphicContent {
    Picture(Box<Picture>),
    Group(Box<WpgGroup>),
    Shape(Box<WpsShape>),
    /// Charts, diagrams and other payloads kept verbatim
    Unknown(RawXmlElement),
}

impl Graphic {
    pub fn picture(pic: Picture) -> Self {
        Self {
            data: GraphicData {
                uri: crate::xml::PIC.to_string(),
                content: Some(GraphicContent::Picture(Box::new(pic))),
            },
        }
    }

    /// The picture, if this frame holds one
    pub fn as_picture(&self) -> Option<&Picture> {
        match &self.data.content {
            Some(GraphicContent::Picture(pic)) => Some(pic),
            _ => None,
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut graphic = Self::default();

        r.children(el, |r, child| {
            if (child.ns, child.local()) != (Ns::A, b"graphicData".as_slice()) {
                return Ok(false);
            }
            graphic.data.uri = child.string(Ns::None, "uri").unwrap_or_default();
            r.children(child, |r, c| {
                let content = match (c.ns, c.local()) {
                    (Ns::Pic, b"pic") => GraphicContent::Picture(Box::new(Picture::decode(r, c)?)),
                    (Ns::Wpg, b"wgp") => GraphicContent::Group(Box::new(WpgGroup::decode(r, c)?)),
                    (Ns::Wps, b"wsp") => GraphicContent::Shape(Box::new(WpsShape::decode(r, c)?)),
                    _ => GraphicContent::Unknown(RawXmlElement::read(r, c)?),
                };
                if graphic.data.content.is_none() {
                    graphic.data.content = Some(content);
                }
                Ok(true)
            })?;
            Ok(true)
        })?;

        Ok(graphic)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("a:graphic");
        elem.attr("xmlns:a", crate::xml::A);
        writer::start(writer, elem)?;

        let mut data = BytesStart::new("a:graphicData");
        data.attr("uri", &self.data.uri);
        writer::start(writer, data)?;
        match &self.data.content {
            Some(GraphicContent::Picture(pic)) => pic.write_to(writer)?,
            Some(GraphicContent::Group(group)) => group.write_to(writer, "wpg:wgp")?,
            Some(GraphicContent::Shape(shape)) => shape.write_to(writer)?,
            Some(GraphicContent::Unknown(raw)) => raw.write_to(writer)?,
            None => {}
        }
        writer::end(writer, "a:graphicData")?;

        writer::end(writer, "a:graphic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_payload_kept() {
        let xml = r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
          <a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">
            <c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" id="rId3"/>
          </a:graphicData>
        </a:graphic>"#;
        let mut r = PartReader::from_bytes("/g.xml", xml.as_bytes(), false);
        let graphic = r
            .read_root((Ns::A, b"graphic"), |r, el| Graphic::decode(r, el))
            .unwrap();

        assert!(graphic.data.uri.ends_with("/chart"));
        match graphic.data.content {
            Some(GraphicContent::Unknown(raw)) => assert_eq!(raw.attr("id"), Some("rId3")),
            other => panic!("unexpected content {:?}", other),
        }
    }
}
