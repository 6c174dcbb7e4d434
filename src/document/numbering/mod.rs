//! Numbering definitions (numbering.xml)
//!
//! Abstract definitions hold the level formats; paragraphs reference a
//! numbering instance (`w:num`) which points at one abstract definition and
//! may override some of its levels.

mod abstract_num;
mod level;
mod num;
mod types;

pub use abstract_num::AbstractNum;
pub use level::{Level, LevelOverride};
pub use num::Num;
pub use types::{LevelSuffix, MultiLevelType, NumberFormat};

use crate::error::Result;
use crate::xml::writer;
use crate::xml::{self, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::collections::BTreeMap;

/// Numbering definitions from numbering.xml
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Numbering {
    /// Root attributes as parsed, namespace declarations included
    pub root_attributes: Vec<(String, String)>,
    pub abstract_nums: BTreeMap<u32, AbstractNum>,
    /// Numbering instances by numId
    pub nums: BTreeMap<u32, Num>,
    /// `w:numPicBullet` and other unmodelled children
    pub unknown_children: Vec<RawXmlElement>,
}

const NUMBERING_ORDER: &[&str] = &["numPicBullet", "abstractNum", "num", "numIdMacAtCleanup"];

impl Numbering {
    /// Create a new empty numbering definitions
    pub fn new() -> Self {
        Numbering::default()
    }

    /// Parse numbering.xml content
    pub fn from_xml(part: &str, data: &[u8], strict: bool) -> Result<Self> {
        let mut r = PartReader::from_bytes(part, data, strict);
        r.read_root((Ns::W, b"numbering"), |r, el| {
            let mut numbering = Numbering {
                root_attributes: el.raw_attributes(),
                ..Default::default()
            };
            r.children(el, |r, child| {
                match (child.ns, child.local()) {
                    (Ns::W, b"abstractNum") => {
                        let abs = AbstractNum::decode(r, child)?;
                        numbering.abstract_nums.insert(abs.abstract_num_id, abs);
                    }
                    (Ns::W, b"num") => {
                        let num = Num::decode(r, child)?;
                        numbering.nums.insert(num.num_id, num);
                    }
                    _ => numbering.unknown_children.push(RawXmlElement::read(r, child)?),
                }
                Ok(true)
            })?;
            Ok(numbering)
        })
    }

    /// Serialize to XML
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        let mut attrs = self.root_attributes.clone();
        xml::complete_root_attributes(&mut attrs);

        writer::write_decl(&mut writer)?;
        let mut start = BytesStart::new("w:numbering");
        for (key, value) in &attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer::start(&mut writer, start)?;
        writer::write_in_order(&mut writer, NUMBERING_ORDER, &self.unknown_children, |w, name| {
            match name {
                "abstractNum" => {
                    for abs in self.abstract_nums.values() {
                        abs.write_to(w)?;
                    }
                    Ok(())
                }
                "num" => {
                    for num in self.nums.values() {
                        num.write_to(w)?;
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        })?;
        writer::end(&mut writer, "w:numbering")?;
        Ok(writer.into_inner())
    }

    /// Level definition in effect for a numId, honouring level overrides
    pub fn get_level(&self, num_id: u32, level: u8) -> Option<&Level> {
        let num = self.nums.get(&num_id)?;
        let overridden = num
            .level_overrides
            .iter()
            .find(|o| o.ilvl == level)
            .and_then(|o| o.level.as_ref());
        if overridden.is_some() {
            return overridden;
        }
        self.abstract_nums.get(&num.abstract_num_id)?.levels.get(&level)
    }

    /// Get the format for a specific numId and level
    pub fn get_format(&self, num_id: u32, level: u8) -> Option<&NumberFormat> {
        self.get_level(num_id, level)?.num_fmt.as_ref()
    }

    /// Get level text for a specific numId and level
    pub fn get_level_text(&self, num_id: u32, level: u8) -> Option<&str> {
        self.get_level(num_id, level)?.level_text.as_deref()
    }

    /// Start value for a level, with any start override applied
    pub fn get_start(&self, num_id: u32, level: u8) -> Option<u32> {
        let num = self.nums.get(&num_id)?;
        num.level_overrides
            .iter()
            .find(|o| o.ilvl == level)
            .and_then(|o| o.start_override)
            .or_else(|| self.get_level(num_id, level)?.start)
    }

    /// Check if a numId represents a bullet list
    pub fn is_bullet_list(&self, num_id: u32) -> bool {
        self.get_format(num_id, 0)
            .map(NumberFormat::is_bullet)
            .unwrap_or(false)
    }

    /// Next free numbering instance id.
    ///
    /// Ids start at 1 since `w:numId="0"` removes numbering from a paragraph.
    pub fn next_num_id(&self) -> u32 {
        next_free_id(&self.nums, 1)
    }

    /// Next free abstract definition id
    pub fn next_abstract_id(&self) -> u32 {
        next_free_id(&self.abstract_nums, 0)
    }

    /// Add a bullet list definition and return the numId
    pub fn add_bullet_list(&mut self) -> u32 {
        let id = self.next_abstract_id();
        self.add_abstract_num(AbstractNum::bullet_list(id))
    }

    /// Add a decimal numbered list definition and return the numId
    pub fn add_decimal_list(&mut self) -> u32 {
        let id = self.next_abstract_id();
        self.add_abstract_num(AbstractNum::decimal_list(id))
    }

    /// Add a custom abstract definition with a fresh id and return the numId
    /// of a new instance pointing at it
    pub fn add_abstract_num(&mut self, mut abs_num: AbstractNum) -> u32 {
        let abs_id = self.next_abstract_id();
        abs_num.abstract_num_id = abs_id;
        self.abstract_nums.insert(abs_id, abs_num);
        self.add_num(abs_id)
    }

    /// New instance of an existing abstract definition, so its numbering
    /// restarts independently
    pub fn add_num(&mut self, abstract_num_id: u32) -> u32 {
        let num_id = self.next_num_id();
        self.nums.insert(num_id, Num::new(num_id, abstract_num_id));
        num_id
    }

    pub fn is_empty(&self) -> bool {
        self.abstract_nums.is_empty() && self.nums.is_empty()
    }
}

/// One past the largest key, or the lowest gap from `first` when the
/// largest key is `u32::MAX`
fn next_free_id<V>(map: &BTreeMap<u32, V>, first: u32) -> u32 {
    match map.keys().next_back() {
        None => first,
        Some(&max) => match max.checked_add(1) {
            Some(id) => id,
            None => (first..=u32::MAX)
                .find(|id| !map.contains_key(id))
                .unwrap_or(first),
        },
    }
}
