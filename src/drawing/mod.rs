//! DrawingML subtree: inline and floating placements, graphic frames,
//! pictures, shapes, groups and the legacy VML fallback

mod alternate;
mod anchor;
mod graphic;
mod inline;
mod picture;
mod position;
mod shape_props;
mod types;
mod vml;
mod wpg;
mod wps;
mod wrap;

pub use alternate::{AlternateContent, McChoice, McContent};
pub use anchor::Anchor;
pub use graphic::{Graphic, GraphicContent, GraphicData};
pub use inline::{GraphicFrameProps, Inline};
pub use picture::{Blip, BlipExtension, BlipFill, FillMode, Picture, Tile, USE_LOCAL_DPI_EXT};
pub use position::{AlignH, AlignV, Placement, Position, PositionH, PositionV, RelFromH, RelFromV};
pub use shape_props::{
    BlackWhiteMode, Fill, GeomGuide, Geometry, GradientFill, GradientStop, LineProperties,
    LinearShade, PresetGeometry, ShapeProperties,
};
pub use types::{
    EffectExtent, GraphicFrameLocks, GroupLocks, NonVisualProps, PicLocks, Point2D,
    PositiveSize2D, RelativeRect, ShapeLocks, SrgbColor, Transform2D,
};
pub use vml::{Group as VmlGroup, ImageData, Pict, Rect as VmlRect, Shape as VmlShapeElement};
pub use vml::{ShapeType, VmlFill, VmlLock, VmlPath, VmlShape};
pub use wpg::{GroupMember, WpgGroup};
pub use wps::{Autofit, BodyProperties, TextAnchor, TextVertical, TextWrapping, WpsShape};
pub use wrap::{Wrap, WrapPath, WrapPolygon, WrapSquare, WrapText, WrapTopBottom};

use crate::error::Result;
use crate::xml::writer;
use crate::xml::{Element, Ns, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// `w:drawing`: exactly one placement
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Drawing {
    Anchor(Box<Anchor>),
    Inline(Box<Inline>),
}

impl Drawing {
    /// Graphic frame of either placement
    pub fn graphic(&self) -> &Graphic {
        match self {
            Drawing::Anchor(anchor) => &anchor.graphic,
            Drawing::Inline(inline) => &inline.graphic,
        }
    }

    /// Non-visual properties (`wp:docPr`)
    pub fn doc_pr(&self) -> &NonVisualProps {
        match self {
            Drawing::Anchor(anchor) => &anchor.doc_pr,
            Drawing::Inline(inline) => &inline.doc_pr,
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut drawing = None;
        r.children(el, |r, child| {
            let found = match (child.ns, child.local()) {
                (Ns::Wp, b"anchor") => Drawing::Anchor(Box::new(Anchor::decode(r, child)?)),
                (Ns::Wp, b"inline") => Drawing::Inline(Box::new(Inline::decode(r, child)?)),
                _ => return Ok(false),
            };
            if drawing.is_some() {
                r.choice_conflict(el, "placement", &child.name());
            } else {
                drawing = Some(found);
            }
            Ok(true)
        })?;

        drawing.ok_or_else(|| r.malformed(Some(el.name()), "drawing has no anchor or inline"))
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer::start(writer, BytesStart::new("w:drawing"))?;
        match self {
            Drawing::Anchor(anchor) => anchor.write_to(writer)?,
            Drawing::Inline(inline) => inline.write_to(writer)?,
        }
        writer::end(writer, "w:drawing")
    }
}

impl From<Inline> for Drawing {
    fn from(inline: Inline) -> Self {
        Drawing::Inline(Box::new(inline))
    }
}

impl From<Anchor> for Drawing {
    fn from(anchor: Anchor) -> Self {
        Drawing::Anchor(Box::new(anchor))
    }
}
