//! Level definitions for numbering

use crate::document::{Justification, ParagraphProperties, RunProperties};
use crate::document::paragraph::Indentation;
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, LongHexNum, Ns, OptBool, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

use super::types::{LevelSuffix, NumberFormat};

/// Level definition (w:lvl)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    /// Level index (0-8)
    pub ilvl: u8,
    /// Template code
    pub tplc: Option<LongHexNum>,
    pub tentative: OptBool,
    /// Start value
    pub start: Option<u32>,
    pub num_fmt: Option<NumberFormat>,
    /// Level after which numbering restarts
    pub restart: Option<u32>,
    /// Paragraph style linked to this level
    pub style: Option<String>,
    /// Legal numbering (arabic numerals for every level)
    pub is_lgl: Option<bool>,
    pub suffix: Option<LevelSuffix>,
    /// Level text (e.g., "%1.", "%1.%2.")
    pub level_text: Option<String>,
    pub justification: Option<Justification>,
    pub paragraph_properties: Option<ParagraphProperties>,
    pub run_properties: Option<RunProperties>,
    pub unknown_children: Vec<RawXmlElement>,
}

/// Level override (w:lvlOverride)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelOverride {
    pub ilvl: u8,
    pub start_override: Option<u32>,
    /// Replacement level definition
    pub level: Option<Level>,
}

const LVL_ORDER: &[&str] = &[
    "start",
    "numFmt",
    "lvlRestart",
    "pStyle",
    "isLgl",
    "suff",
    "lvlText",
    "lvlPicBulletId",
    "legacy",
    "lvlJc",
    "pPr",
    "rPr",
];

impl Level {
    /// Create a new level with the given index
    pub fn new(ilvl: u8) -> Self {
        Level {
            ilvl,
            start: Some(1),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, fmt: NumberFormat) -> Self {
        self.num_fmt = Some(fmt);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.level_text = Some(text.into());
        self
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_justification(mut self, jc: Justification) -> Self {
        self.justification = Some(jc);
        self
    }

    /// Set left and hanging indentation in twips
    pub fn with_indent(mut self, left: i32, hanging: u32) -> Self {
        let props = self.paragraph_properties.get_or_insert_with(Default::default);
        props.indentation = Some(Indentation {
            left: Some(left),
            hanging: Some(hanging),
            ..Default::default()
        });
        self
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut level = Level {
            ilvl: r.num_attr(el, Ns::W, "ilvl")?.unwrap_or(0),
            tplc: r.hex_attr(el, Ns::W, "tplc")?,
            tentative: r.bool_attr(el, Ns::W, "tentative")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            if child.ns != Ns::W {
                level.unknown_children.push(RawXmlElement::read(r, child)?);
                return Ok(true);
            }
            match child.local() {
                b"start" => level.start = r.num_val(child)?,
                b"numFmt" => level.num_fmt = r.enum_val(child)?,
                b"lvlRestart" => level.restart = r.num_val(child)?,
                b"pStyle" => level.style = child.val().map(str::to_string),
                b"isLgl" => level.is_lgl = Some(r.toggle(child)?),
                b"suff" => level.suffix = r.enum_val(child)?,
                b"lvlText" => level.level_text = child.val().map(str::to_string),
                b"lvlJc" => level.justification = r.enum_val(child)?,
                b"pPr" => {
                    level.paragraph_properties = Some(ParagraphProperties::decode(r, child)?);
                    return Ok(true);
                }
                b"rPr" => {
                    level.run_properties = Some(RunProperties::decode(r, child)?);
                    return Ok(true);
                }
                _ => {
                    level.unknown_children.push(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(level)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:lvl");
        start
            .attr("w:ilvl", self.ilvl)
            .opt_attr("w:tplc", self.tplc)
            .bool_attr("w:tentative", self.tentative);
        writer::start(writer, start)?;
        writer::write_in_order(writer, LVL_ORDER, &self.unknown_children, |w, name| {
            match name {
                "start" => writer::write_opt_val(w, "w:start", self.start),
                "numFmt" => writer::write_opt_val(w, "w:numFmt", self.num_fmt.as_ref()),
                "lvlRestart" => writer::write_opt_val(w, "w:lvlRestart", self.restart),
                "pStyle" => writer::write_opt_val(w, "w:pStyle", self.style.as_deref()),
                "isLgl" => writer::write_toggle(w, "w:isLgl", self.is_lgl),
                "suff" => writer::write_opt_val(w, "w:suff", self.suffix.as_ref()),
                "lvlText" => writer::write_opt_val(w, "w:lvlText", self.level_text.as_deref()),
                "lvlJc" => writer::write_opt_val(w, "w:lvlJc", self.justification.as_ref()),
                "pPr" => match &self.paragraph_properties {
                    Some(p) => p.write_to(w),
                    None => Ok(()),
                },
                "rPr" => match &self.run_properties {
                    Some(p) => p.write_to(w),
                    None => Ok(()),
                },
                _ => Ok(()),
            }
        })?;
        writer::end(writer, "w:lvl")
    }
}

impl LevelOverride {
    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut over = LevelOverride {
            ilvl: r.num_attr(el, Ns::W, "ilvl")?.unwrap_or(0),
            ..Default::default()
        };
        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::W, b"startOverride") => over.start_override = r.num_val(child)?,
                (Ns::W, b"lvl") => {
                    over.level = Some(Level::decode(r, child)?);
                    return Ok(true);
                }
                _ => return Ok(false),
            }
            r.skip(child)?;
            Ok(true)
        })?;
        Ok(over)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:lvlOverride");
        start.attr("w:ilvl", self.ilvl);
        if self.start_override.is_none() && self.level.is_none() {
            return writer::empty(writer, start);
        }
        writer::start(writer, start)?;
        writer::write_opt_val(writer, "w:startOverride", self.start_override)?;
        if let Some(level) = &self.level {
            level.write_to(writer)?;
        }
        writer::end(writer, "w:lvlOverride")
    }
}
