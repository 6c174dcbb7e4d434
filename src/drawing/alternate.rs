//! Markup compatibility blocks (`mc:AlternateContent`)
//!
//! Both branches are exposed as decoded; picking which one to render is
//! left to the caller.

use crate::drawing::vml::Pict;
use crate::drawing::Drawing;
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, PartReader};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

/// Content of a Choice or Fallback branch
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum McContent {
    /// `w:drawing`
    Drawing(Drawing),
    /// `w:pict`
    Pict(Pict),
}

/// `mc:Choice`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct McChoice {
    /// Namespace prefixes the consumer must understand, e.g. `wps`
    pub requires: String,
    pub content: Option<McContent>,
}

/// `mc:AlternateContent`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlternateContent {
    pub choice: Option<McChoice>,
    /// `mc:Fallback` content
    pub fallback: Option<McContent>,
}

impl AlternateContent {
    /// The Choice content when recognised, else the Fallback
    pub fn preferred(&self) -> Option<&McContent> {
        self.choice
            .as_ref()
            .and_then(|c| c.content.as_ref())
            .or(self.fallback.as_ref())
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut alt = Self::default();

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::Mc, b"Choice") => {
                    let requires = child.string(Ns::None, "Requires").unwrap_or_default();
                    let content = decode_content(r, child)?;
                    // Only the first Choice is kept
                    if alt.choice.is_none() {
                        alt.choice = Some(McChoice { requires, content });
                    }
                }
                (Ns::Mc, b"Fallback") => alt.fallback = decode_content(r, child)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(alt)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer::start(writer, BytesStart::new("mc:AlternateContent"))?;

        if let Some(McChoice {
            requires,
            content: Some(content),
        }) = &self.choice
        {
            let mut elem = BytesStart::new("mc:Choice");
            elem.attr("Requires", requires);
            writer::start(writer, elem)?;
            content.write_to(writer)?;
            writer::end(writer, "mc:Choice")?;
        }
        if let Some(content) = &self.fallback {
            writer::start(writer, BytesStart::new("mc:Fallback"))?;
            content.write_to(writer)?;
            writer::end(writer, "mc:Fallback")?;
        }

        writer::end(writer, "mc:AlternateContent")
    }
}

impl McContent {
    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            McContent::Drawing(drawing) => drawing.write_to(writer),
            McContent::Pict(pict) => pict.write_to(writer),
        }
    }
}

fn decode_content<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Option<McContent>> {
    let mut content = None;
    r.children(el, |r, child| {
        let found = match (child.ns, child.local()) {
            (Ns::W, b"drawing") => McContent::Drawing(Drawing::decode(r, child)?),
            (Ns::W, b"pict") => McContent::Pict(Pict::decode(r, child)?),
            _ => return Ok(false),
        };
        if content.is_none() {
            content = Some(found);
        }
        Ok(true)
    })?;
    Ok(content)
}
