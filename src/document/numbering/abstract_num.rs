//! Abstract numbering definitions

use crate::document::Justification;
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{Element, LongHexNum, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use super::level::Level;
use super::types::{MultiLevelType, NumberFormat};

/// Abstract numbering definition (w:abstractNum)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbstractNum {
    pub abstract_num_id: u32,
    /// Definition identifier, unique per list definition
    pub nsid: Option<LongHexNum>,
    pub multi_level_type: Option<MultiLevelType>,
    /// Template code
    pub tmpl: Option<LongHexNum>,
    pub name: Option<String>,
    pub style_link: Option<String>,
    pub num_style_link: Option<String>,
    /// Level definitions by index
    pub levels: BTreeMap<u8, Level>,
    pub unknown_children: Vec<RawXmlElement>,
}

const ABSTRACT_NUM_ORDER: &[&str] = &[
    "nsid",
    "multiLevelType",
    "tmpl",
    "name",
    "styleLink",
    "numStyleLink",
    "lvl",
];

const BULLETS: [&str; 3] = ["\u{2022}", "o", "\u{25AA}"];
const DECIMAL_FORMATS: [NumberFormat; 3] = [
    NumberFormat::Decimal,
    NumberFormat::LowerLetter,
    NumberFormat::LowerRoman,
];

impl AbstractNum {
    /// Create a new abstract numbering definition
    pub fn new(id: u32) -> Self {
        AbstractNum {
            abstract_num_id: id,
            multi_level_type: Some(MultiLevelType::HybridMultilevel),
            ..Default::default()
        }
    }

    /// Add a level to this abstract numbering
    pub fn add_level(&mut self, level: Level) {
        self.levels.insert(level.ilvl, level);
    }

    /// Nine-level bullet list, cycling the bullet symbol per level
    pub fn bullet_list(id: u32) -> Self {
        let mut abs = Self::new(id);
        for ilvl in 0..9u8 {
            abs.add_level(
                Level::new(ilvl)
                    .with_format(NumberFormat::Bullet)
                    .with_text(BULLETS[ilvl as usize % BULLETS.len()])
                    .with_justification(Justification::Left)
                    .with_indent(720 * (i32::from(ilvl) + 1), 360),
            );
        }
        abs
    }

    /// Nine-level numbered list: 1. / a. / i. repeating
    pub fn decimal_list(id: u32) -> Self {
        let mut abs = Self::new(id);
        for ilvl in 0..9u8 {
            abs.add_level(
                Level::new(ilvl)
                    .with_format(DECIMAL_FORMATS[ilvl as usize % DECIMAL_FORMATS.len()].clone())
                    .with_text(format!("%{}.", ilvl + 1))
                    .with_justification(Justification::Left)
                    .with_indent(720 * (i32::from(ilvl) + 1), 360),
            );
        }
        abs
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let id = r
            .num_attr(el, Ns::W, "abstractNumId")?
            .ok_or_else(|| r.malformed(Some(el.name()), "missing w:abstractNumId"))?;
        let mut abs = AbstractNum {
            abstract_num_id: id,
            ..Default::default()
        };

        r.children(el, |r, child| {
            if child.ns != Ns::W {
                abs.unknown_children.push(RawXmlElement::read(r, child)?);
                return Ok(true);
            }
            match child.local() {
                b"nsid" => abs.nsid = r.hex_attr(child, Ns::W, "val")?,
                b"multiLevelType" => abs.multi_level_type = r.enum_val(child)?,
                b"tmpl" => abs.tmpl = r.hex_attr(child, Ns::W, "val")?,
                b"name" => abs.name = child.val().map(str::to_string),
                b"styleLink" => abs.style_link = child.val().map(str::to_string),
                b"numStyleLink" => abs.num_style_link = child.val().map(str::to_string),
                b"lvl" => {
                    abs.add_level(Level::decode(r, child)?);
                    return Ok(true);
                }
                _ => {
                    abs.unknown_children.push(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(abs)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:abstractNum");
        start.attr("w:abstractNumId", self.abstract_num_id);
        writer::start(writer, start)?;
        writer::write_in_order(writer, ABSTRACT_NUM_ORDER, &self.unknown_children, |w, name| {
            match name {
                "nsid" => writer::write_opt_val(w, "w:nsid", self.nsid),
                "multiLevelType" => {
                    writer::write_opt_val(w, "w:multiLevelType", self.multi_level_type.as_ref())
                }
                "tmpl" => writer::write_opt_val(w, "w:tmpl", self.tmpl),
                "name" => writer::write_opt_val(w, "w:name", self.name.as_deref()),
                "styleLink" => writer::write_opt_val(w, "w:styleLink", self.style_link.as_deref()),
                "numStyleLink" => {
                    writer::write_opt_val(w, "w:numStyleLink", self.num_style_link.as_deref())
                }
                "lvl" => {
                    for level in self.levels.values() {
                        level.write_to(w)?;
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        })?;
        writer::end(writer, "w:abstractNum")
    }
}
