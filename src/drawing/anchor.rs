//! Floating drawing placement (`wp:anchor`)

use crate::drawing::graphic::Graphic;
use crate::drawing::inline::GraphicFrameProps;
use crate::drawing::position::{AlignH, AlignV, PositionH, PositionV, RelFromH, RelFromV};
use crate::drawing::types::{EffectExtent, NonVisualProps, Point2D, PositiveSize2D};
use crate::drawing::wrap::Wrap;
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, LongHexNum, Ns, OptBool, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// `wp:anchor`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub dist_t: u32,
    pub dist_b: u32,
    pub dist_l: u32,
    pub dist_r: u32,
    /// `simplePos` attribute: position by `simple_pos` instead of the axes
    pub simple_pos_enabled: OptBool,
    /// Z-order among floating objects
    pub relative_height: u32,
    pub behind_doc: OptBool,
    pub locked: OptBool,
    pub layout_in_cell: OptBool,
    pub hidden: OptBool,
    pub allow_overlap: OptBool,
    /// `wp14:anchorId`
    pub anchor_id: Option<LongHexNum>,
    /// `wp14:editId`
    pub edit_id: Option<LongHexNum>,
    pub simple_pos: Point2D,
    pub position_h: PositionH,
    pub position_v: PositionV,
    pub extent: PositiveSize2D,
    pub effect_extent: Option<EffectExtent>,
    /// At most one wrap policy
    pub wrap: Option<Wrap>,
    pub doc_pr: NonVisualProps,
    pub frame_pr: Option<GraphicFrameProps>,
    pub graphic: Graphic,
}

impl Anchor {
    /// Floating graphic at the top left of its column and paragraph
    pub fn new(graphic: Graphic, extent: PositiveSize2D, doc_pr: NonVisualProps) -> Self {
        Self {
            dist_t: 0,
            dist_b: 0,
            dist_l: 114_300,
            dist_r: 114_300,
            simple_pos_enabled: OptBool::FALSE,
            relative_height: 251_658_240,
            behind_doc: OptBool::FALSE,
            locked: OptBool::FALSE,
            layout_in_cell: OptBool::TRUE,
            hidden: OptBool::UNSET,
            allow_overlap: OptBool::TRUE,
            anchor_id: None,
            edit_id: None,
            simple_pos: Point2D::default(),
            position_h: PositionH::offset(RelFromH::Column, 0),
            position_v: PositionV::offset(RelFromV::Paragraph, 0),
            extent,
            effect_extent: None,
            wrap: None,
            doc_pr,
            frame_pr: None,
            graphic,
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut anchor = Self::new(
            Graphic::default(),
            PositiveSize2D::default(),
            NonVisualProps::default(),
        );
        anchor.dist_t = r.num_attr(el, Ns::None, "distT")?.unwrap_or(0);
        anchor.dist_b = r.num_attr(el, Ns::None, "distB")?.unwrap_or(0);
        anchor.dist_l = r.num_attr(el, Ns::None, "distL")?.unwrap_or(0);
        anchor.dist_r = r.num_attr(el, Ns::None, "distR")?.unwrap_or(0);
        anchor.simple_pos_enabled = r.bool_attr(el, Ns::None, "simplePos")?;
        anchor.relative_height = r.num_attr(el, Ns::None, "relativeHeight")?.unwrap_or(0);
        anchor.behind_doc = r.bool_attr(el, Ns::None, "behindDoc")?;
        anchor.locked = r.bool_attr(el, Ns::None, "locked")?;
        anchor.layout_in_cell = r.bool_attr(el, Ns::None, "layoutInCell")?;
        anchor.hidden = r.bool_attr(el, Ns::None, "hidden")?;
        anchor.allow_overlap = r.bool_attr(el, Ns::None, "allowOverlap")?;
        anchor.anchor_id = r.hex_attr(el, Ns::Wp14, "anchorId")?;
        anchor.edit_id = r.hex_attr(el, Ns::Wp14, "editId")?;

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::Wp, b"simplePos") => {
                    anchor.simple_pos = Point2D::decode(r, child)?;
                    r.skip(child)?;
                }
                (Ns::Wp, b"positionH") => anchor.position_h = PositionH::decode(r, child)?,
                (Ns::Wp, b"positionV") => anchor.position_v = PositionV::decode(r, child)?,
                (Ns::Wp, b"extent") => {
                    anchor.extent = PositiveSize2D::decode(r, child)?;
                    r.skip(child)?;
                }
                (Ns::Wp, b"effectExtent") => {
                    anchor.effect_extent = Some(EffectExtent::decode(r, child)?);
                    r.skip(child)?;
                }
                (Ns::Wp, b"docPr") => anchor.doc_pr = NonVisualProps::decode(r, child)?,
                (Ns::Wp, b"cNvGraphicFramePr") => {
                    anchor.frame_pr = Some(GraphicFrameProps::decode(r, child)?)
                }
                (Ns::A, b"graphic") => anchor.graphic = Graphic::decode(r, child)?,
                _ => match Wrap::decode(r, child)? {
                    Some(wrap) => Wrap::choose(r, el, &mut anchor.wrap, wrap),
                    None => return Ok(false),
                },
            }
            Ok(true)
        })?;

        Ok(anchor)
    }

    /// Children in schema order: simplePos, positionH, positionV, extent,
    /// effectExtent, wrap, docPr, cNvGraphicFramePr, graphic
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut elem = BytesStart::new("wp:anchor");
        elem.attr("distT", self.dist_t)
            .attr("distB", self.dist_b)
            .attr("distL", self.dist_l)
            .attr("distR", self.dist_r)
            .attr("simplePos", required(self.simple_pos_enabled))
            .attr("relativeHeight", self.relative_height)
            .attr("behindDoc", required(self.behind_doc))
            .attr("locked", required(self.locked))
            .attr("layoutInCell", required(self.layout_in_cell))
            .bool_attr("hidden", self.hidden)
            .attr("allowOverlap", required(self.allow_overlap))
            .opt_attr("wp14:anchorId", self.anchor_id)
            .opt_attr("wp14:editId", self.edit_id);
        writer::start(writer, elem)?;

        self.simple_pos.write_to(writer, "wp:simplePos")?;
        self.position_h.write_to(writer, "wp:positionH")?;
        self.position_v.write_to(writer, "wp:positionV")?;
        self.extent.write_to(writer, "wp:extent")?;
        if let Some(effect) = &self.effect_extent {
            effect.write_to(writer)?;
        }
        if let Some(wrap) = &self.wrap {
            wrap.write_to(writer)?;
        }
        self.doc_pr.write_to(writer, "wp:docPr")?;
        if let Some(frame_pr) = &self.frame_pr {
            frame_pr.write_to(writer)?;
        }
        self.graphic.write_to(writer)?;

        writer::end(writer, "wp:anchor")
    }

    /// Align horizontally instead of offsetting
    pub fn align_h(&mut self, relative_from: RelFromH, align: AlignH) {
        self.position_h = PositionH::align(relative_from, align);
    }

    /// Align vertically instead of offsetting
    pub fn align_v(&mut self, relative_from: RelFromV, align: AlignV) {
        self.position_v = PositionV::align(relative_from, align);
    }
}

/// Attributes the schema requires are written as `0` when unset
fn required(value: OptBool) -> &'static str {
    value.as_attr().unwrap_or("0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::position::Placement;
    use crate::drawing::wrap::{WrapSquare, WrapText, WrapTopBottom};
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    const ANCHOR: &str = r#"<wp:anchor xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
        xmlns:wp14="http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing"
        xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
        distT="0" distB="0" distL="114300" distR="114300" simplePos="0" relativeHeight="251659264"
        behindDoc="1" locked="0" layoutInCell="1" allowOverlap="1" wp14:anchorId="5F3A2B10">
      <wp:simplePos x="0" y="0"/>
      <wp:positionH relativeFrom="margin"><wp:align>right</wp:align></wp:positionH>
      <wp:positionV relativeFrom="page"><wp:posOffset>457200</wp:posOffset></wp:positionV>
      <wp:extent cx="1828800" cy="914400"/>
      <wp:effectExtent l="0" t="0" r="0" b="0"/>
      <wp:wrapSquare wrapText="bothSides"/>
      <wp:docPr id="2" name="Shape 2"/>
      <wp:cNvGraphicFramePr/>
      <a:graphic><a:graphicData uri="urn:x"/></a:graphic>
    </wp:anchor>"#;

    fn decode(xml: &str) -> Anchor {
        let mut r = PartReader::from_bytes("/a.xml", xml.as_bytes(), false);
        r.read_root((Ns::Wp, b"anchor"), |r, el| Anchor::decode(r, el))
            .unwrap()
    }

    #[test]
    fn test_decode_anchor() {
        let anchor = decode(ANCHOR);

        assert_eq!(anchor.dist_l, 114300);
        assert!(anchor.behind_doc.is_true());
        assert_eq!(anchor.locked, OptBool::FALSE);
        assert_eq!(anchor.relative_height, 251659264);
        assert_eq!(anchor.anchor_id, Some(LongHexNum(0x5F3A2B10)));
        assert_eq!(anchor.position_h, PositionH::align(RelFromH::Margin, AlignH::Right));
        assert_eq!(anchor.position_v.placement, Placement::Offset(457200));
        assert_eq!(anchor.extent, PositiveSize2D::new(1828800, 914400));
        assert_eq!(anchor.wrap, Some(Wrap::Square(WrapSquare::new(WrapText::BothSides))));
        assert_eq!(anchor.doc_pr.id, 2);
        assert_eq!(anchor.frame_pr, Some(GraphicFrameProps::default()));
        assert_eq!(anchor.graphic.data.uri, "urn:x");
    }

    #[test]
    fn test_encode_emits_only_populated_wrap() {
        let mut anchor = Anchor::new(
            Graphic::default(),
            PositiveSize2D::new(10, 10),
            NonVisualProps::new(1, "a"),
        );
        anchor.wrap = Some(Wrap::TopAndBottom(WrapTopBottom::default()));
        let xml = to_xml_string(|w| anchor.write_to(w)).unwrap();

        assert_eq!(xml.matches("<wp:wrap").count(), 1);
        assert!(xml.contains("<wp:wrapTopAndBottom/>"));
        assert!(xml.find("<wp:extent").unwrap() < xml.find("<wp:wrapTopAndBottom").unwrap());
        assert!(xml.find("<wp:wrapTopAndBottom").unwrap() < xml.find("<wp:docPr").unwrap());
    }

    #[test]
    fn test_reencode_keeps_schema_order() {
        let anchor = decode(ANCHOR);
        let xml = to_xml_string(|w| anchor.write_to(w)).unwrap();

        let order: Vec<usize> = [
            "<wp:simplePos",
            "<wp:positionH",
            "<wp:positionV",
            "<wp:extent",
            "<wp:effectExtent",
            "<wp:wrapSquare",
            "<wp:docPr",
            "<wp:cNvGraphicFramePr",
            "<a:graphic ",
        ]
        .iter()
        .map(|tag| xml.find(tag).unwrap())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(xml.contains(r#"behindDoc="1""#));
        assert!(xml.contains(r#"wp14:anchorId="5F3A2B10""#));
    }
}
