//! Numbering instance definitions

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

use super::level::LevelOverride;

/// Numbering instance (w:num)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Num {
    /// Numbering ID (referenced by paragraphs)
    pub num_id: u32,
    pub abstract_num_id: u32,
    pub level_overrides: Vec<LevelOverride>,
    pub unknown_children: Vec<RawXmlElement>,
}

impl Num {
    /// Create a new numbering instance
    pub fn new(num_id: u32, abstract_num_id: u32) -> Self {
        Num {
            num_id,
            abstract_num_id,
            ..Default::default()
        }
    }

    /// Restart numbering of `ilvl` at `start` for this instance
    pub fn with_start_override(mut self, ilvl: u8, start: u32) -> Self {
        self.level_overrides.push(LevelOverride {
            ilvl,
            start_override: Some(start),
            level: None,
        });
        self
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let num_id = r
            .num_attr(el, Ns::W, "numId")?
            .ok_or_else(|| r.malformed(Some(el.name()), "missing w:numId"))?;
        let mut num = Num::new(num_id, 0);
        let mut abstract_id = None;

        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::W, b"abstractNumId") => {
                    abstract_id = r.num_val(child)?;
                    r.skip(child)?;
                }
                (Ns::W, b"lvlOverride") => num.level_overrides.push(LevelOverride::decode(r, child)?),
                _ => num.unknown_children.push(RawXmlElement::read(r, child)?),
            }
            Ok(true)
        })?;

        num.abstract_num_id = abstract_id
            .ok_or_else(|| r.malformed(Some(el.name()), "missing w:abstractNumId"))?;
        Ok(num)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:num");
        start.attr("w:numId", self.num_id);
        writer::start(writer, start)?;
        writer::write_val(writer, "w:abstractNumId", self.abstract_num_id)?;
        for over in &self.level_overrides {
            over.write_to(writer)?;
        }
        for child in &self.unknown_children {
            child.write_to(writer)?;
        }
        writer::end(writer, "w:num")
    }
}
