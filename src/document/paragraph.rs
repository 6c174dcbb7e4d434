//! Paragraph element (w:p)

use crate::document::{Run, RunProperties, SectionProperties};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, XmlEnum};
use crate::xml::{Element, LongHexNum, Ns, OptBool, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `w:jc/@w:val`
    pub enum Justification {
        Left => "left",
        Start => "start",
        Center => "center",
        Right => "right",
        End => "end",
        Both => "both",
        Distribute => "distribute",
    }
}

xml_enum! {
    /// `w:spacing/@w:lineRule`
    pub enum LineRule {
        Auto => "auto",
        Exact => "exact",
        AtLeast => "atLeast",
    }
}

/// Paragraph element (w:p)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub rsid_r: Option<LongHexNum>,
    pub rsid_r_pr: Option<LongHexNum>,
    pub rsid_r_default: Option<LongHexNum>,
    pub rsid_p: Option<LongHexNum>,
    /// `w14:paraId`
    pub para_id: Option<LongHexNum>,
    /// `w14:textId`
    pub text_id: Option<LongHexNum>,
    pub properties: ParagraphProperties,
    /// Paragraph content (runs, hyperlinks, etc.)
    pub content: Vec<ParagraphContent>,
}

/// Content within a paragraph
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParagraphContent {
    Run(Run),
    Hyperlink(Hyperlink),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
    /// `w:fldSimple`
    SimpleField(SimpleField),
    /// Unmodelled element, kept verbatim
    Unknown(RawXmlElement),
}

/// Hyperlink element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hyperlink {
    /// Relationship ID (for external links)
    pub r_id: Option<String>,
    /// Anchor (for internal links)
    pub anchor: Option<String>,
    pub tooltip: Option<String>,
    pub history: OptBool,
    pub runs: Vec<Run>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookmarkStart {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookmarkEnd {
    pub id: String,
}

/// Field given by its instruction alone, such as `PAGE`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimpleField {
    pub instr: String,
    pub dirty: OptBool,
    /// Cached result
    pub runs: Vec<Run>,
}

/// `w:numPr`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumberingRef {
    pub num_id: Option<u32>,
    pub ilvl: Option<u32>,
}

/// `w:spacing`, in twips or hundredths of a line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Spacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
    pub before_lines: Option<i32>,
    pub after_lines: Option<i32>,
    pub before_autospacing: OptBool,
    pub after_autospacing: OptBool,
    pub line: Option<i32>,
    pub line_rule: Option<LineRule>,
}

/// `w:ind`, in twips. `w:start`/`w:end` are read as left/right.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Indentation {
    pub left: Option<i32>,
    pub right: Option<i32>,
    pub first_line: Option<u32>,
    pub hanging: Option<u32>,
    pub left_chars: Option<i32>,
    pub right_chars: Option<i32>,
    pub first_line_chars: Option<i32>,
    pub hanging_chars: Option<i32>,
}

/// Paragraph properties (w:pPr)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParagraphProperties {
    /// Style ID
    pub style: Option<String>,
    pub keep_next: Option<bool>,
    pub keep_lines: Option<bool>,
    pub page_break_before: Option<bool>,
    pub numbering: Option<NumberingRef>,
    pub spacing: Option<Spacing>,
    pub indentation: Option<Indentation>,
    pub justification: Option<Justification>,
    /// Outline level (for headings)
    pub outline_level: Option<u8>,
    /// Formatting of the paragraph mark
    pub mark_properties: Option<RunProperties>,
    /// Present when this paragraph ends a section
    pub section: Option<SectionProperties>,
    pub unknown_children: Vec<RawXmlElement>,
}

const PPR_ORDER: &[&str] = &[
    "pStyle",
    "keepNext",
    "keepLines",
    "pageBreakBefore",
    "framePr",
    "widowControl",
    "numPr",
    "suppressLineNumbers",
    "pBdr",
    "shd",
    "tabs",
    "suppressAutoHyphens",
    "kinsoku",
    "wordWrap",
    "overflowPunct",
    "topLinePunct",
    "autoSpaceDE",
    "autoSpaceDN",
    "bidi",
    "adjustRightInd",
    "snapToGrid",
    "spacing",
    "ind",
    "contextualSpacing",
    "mirrorIndents",
    "suppressOverlap",
    "jc",
    "textDirection",
    "textAlignment",
    "textboxTightWrap",
    "outlineLvl",
    "divId",
    "cnfStyle",
    "rPr",
    "sectPr",
    "pPrChange",
];

impl ParagraphProperties {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut props = Self::default();

        r.children(el, |r, child| {
            if child.ns != Ns::W {
                props.unknown_children.push(RawXmlElement::read(r, child)?);
                return Ok(true);
            }
            match child.local() {
                b"pStyle" => props.style = child.val().map(str::to_string),
                b"keepNext" => props.keep_next = Some(r.toggle(child)?),
                b"keepLines" => props.keep_lines = Some(r.toggle(child)?),
                b"pageBreakBefore" => props.page_break_before = Some(r.toggle(child)?),
                b"numPr" => {
                    let mut num = NumberingRef::default();
                    r.children(child, |r, c| {
                        match (c.ns, c.local()) {
                            (Ns::W, b"numId") => num.num_id = r.num_val(c)?,
                            (Ns::W, b"ilvl") => num.ilvl = r.num_val(c)?,
                            _ => {}
                        }
                        Ok(false)
                    })?;
                    props.numbering = Some(num);
                    return Ok(true);
                }
                b"spacing" => {
                    props.spacing = Some(Spacing {
                        before: r.num_attr(child, Ns::W, "before")?,
                        after: r.num_attr(child, Ns::W, "after")?,
                        before_lines: r.num_attr(child, Ns::W, "beforeLines")?,
                        after_lines: r.num_attr(child, Ns::W, "afterLines")?,
                        before_autospacing: r.bool_attr(child, Ns::W, "beforeAutospacing")?,
                        after_autospacing: r.bool_attr(child, Ns::W, "afterAutospacing")?,
                        line: r.num_attr(child, Ns::W, "line")?,
                        line_rule: r.enum_attr(child, Ns::W, "lineRule")?,
                    })
                }
                b"ind" => {
                    let left = match r.num_attr(child, Ns::W, "left")? {
                        Some(v) => Some(v),
                        None => r.num_attr(child, Ns::W, "start")?,
                    };
                    let right = match r.num_attr(child, Ns::W, "right")? {
                        Some(v) => Some(v),
                        None => r.num_attr(child, Ns::W, "end")?,
                    };
                    props.indentation = Some(Indentation {
                        left,
                        right,
                        first_line: r.num_attr(child, Ns::W, "firstLine")?,
                        hanging: r.num_attr(child, Ns::W, "hanging")?,
                        left_chars: r.num_attr(child, Ns::W, "leftChars")?,
                        right_chars: r.num_attr(child, Ns::W, "rightChars")?,
                        first_line_chars: r.num_attr(child, Ns::W, "firstLineChars")?,
                        hanging_chars: r.num_attr(child, Ns::W, "hangingChars")?,
                    })
                }
                b"jc" => props.justification = r.enum_val(child)?,
                b"outlineLvl" => props.outline_level = r.num_val(child)?,
                b"rPr" => {
                    props.mark_properties = Some(RunProperties::decode(r, child)?);
                    return Ok(true);
                }
                b"sectPr" => {
                    props.section = Some(SectionProperties::decode(r, child)?);
                    return Ok(true);
                }
                _ => {
                    props.unknown_children.push(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(props)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        writer::start(writer, BytesStart::new("w:pPr"))?;
        writer::write_in_order(writer, PPR_ORDER, &self.unknown_children, |w, name| {
            self.write_child(w, name)
        })?;
        writer::end(writer, "w:pPr")
    }

    fn write_child<W: Write>(&self, w: &mut Writer<W>, name: &str) -> Result<()> {
        match name {
            "pStyle" => writer::write_opt_val(w, "w:pStyle", self.style.as_deref()),
            "keepNext" => writer::write_toggle(w, "w:keepNext", self.keep_next),
            "keepLines" => writer::write_toggle(w, "w:keepLines", self.keep_lines),
            "pageBreakBefore" => writer::write_toggle(w, "w:pageBreakBefore", self.page_break_before),
            "numPr" => match &self.numbering {
                Some(num) => {
                    writer::start(w, BytesStart::new("w:numPr"))?;
                    writer::write_opt_val(w, "w:ilvl", num.ilvl)?;
                    writer::write_opt_val(w, "w:numId", num.num_id)?;
                    writer::end(w, "w:numPr")
                }
                None => Ok(()),
            },
            "spacing" => match &self.spacing {
                Some(s) => {
                    let mut elem = BytesStart::new("w:spacing");
                    elem.opt_attr("w:before", s.before)
                        .opt_attr("w:beforeLines", s.before_lines)
                        .bool_attr("w:beforeAutospacing", s.before_autospacing)
                        .opt_attr("w:after", s.after)
                        .opt_attr("w:afterLines", s.after_lines)
                        .bool_attr("w:afterAutospacing", s.after_autospacing)
                        .opt_attr("w:line", s.line)
                        .opt_attr("w:lineRule", s.line_rule.as_ref().map(XmlEnum::as_str));
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            "ind" => match &self.indentation {
                Some(ind) => {
                    let mut elem = BytesStart::new("w:ind");
                    elem.opt_attr("w:left", ind.left)
                        .opt_attr("w:leftChars", ind.left_chars)
                        .opt_attr("w:right", ind.right)
                        .opt_attr("w:rightChars", ind.right_chars)
                        .opt_attr("w:hanging", ind.hanging)
                        .opt_attr("w:hangingChars", ind.hanging_chars)
                        .opt_attr("w:firstLine", ind.first_line)
                        .opt_attr("w:firstLineChars", ind.first_line_chars);
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            "jc" => writer::write_opt_val(w, "w:jc", self.justification.as_ref()),
            "outlineLvl" => writer::write_opt_val(w, "w:outlineLvl", self.outline_level),
            "rPr" => match &self.mark_properties {
                Some(props) => props.write_to(w),
                None => Ok(()),
            },
            "sectPr" => match &self.section {
                Some(sect) => sect.write_to(w),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl Paragraph {
    /// Create a paragraph with one run of text
    pub fn new(text: impl Into<String>) -> Self {
        let mut para = Paragraph::default();
        para.add_run(Run::new(text));
        para
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut para = Paragraph {
            rsid_r: r.hex_attr(el, Ns::W, "rsidR")?,
            rsid_r_pr: r.hex_attr(el, Ns::W, "rsidRPr")?,
            rsid_r_default: r.hex_attr(el, Ns::W, "rsidRDefault")?,
            rsid_p: r.hex_attr(el, Ns::W, "rsidP")?,
            para_id: r.hex_attr(el, Ns::W14, "paraId")?,
            text_id: r.hex_attr(el, Ns::W14, "textId")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            let content = match (child.ns, child.local()) {
                (Ns::W, b"pPr") => {
                    para.properties = ParagraphProperties::decode(r, child)?;
                    return Ok(true);
                }
                (Ns::W, b"r") => ParagraphContent::Run(Run::decode(r, child)?),
                (Ns::W, b"hyperlink") => ParagraphContent::Hyperlink(Hyperlink::decode(r, child)?),
                (Ns::W, b"fldSimple") => ParagraphContent::SimpleField(SimpleField::decode(r, child)?),
                (Ns::W, b"bookmarkStart") => {
                    let bookmark = BookmarkStart {
                        id: child.string(Ns::W, "id").unwrap_or_default(),
                        name: child.string(Ns::W, "name").unwrap_or_default(),
                    };
                    r.skip(child)?;
                    ParagraphContent::BookmarkStart(bookmark)
                }
                (Ns::W, b"bookmarkEnd") => {
                    let bookmark = BookmarkEnd {
                        id: child.string(Ns::W, "id").unwrap_or_default(),
                    };
                    r.skip(child)?;
                    ParagraphContent::BookmarkEnd(bookmark)
                }
                _ => ParagraphContent::Unknown(RawXmlElement::read(r, child)?),
            };
            para.content.push(content);
            Ok(true)
        })?;

        Ok(para)
    }

    /// Plain text of all runs, hyperlinks and fields
    pub fn text(&self) -> String {
        self.runs().map(Run::text).collect()
    }

    /// Get style ID
    pub fn style(&self) -> Option<&str> {
        self.properties.style.as_deref()
    }

    /// Runs in reading order, including those inside hyperlinks and simple fields
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().flat_map(ParagraphContent::runs)
    }

    /// Mutable runs, in the same order as [`Paragraph::runs`]
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.content.iter_mut().flat_map(ParagraphContent::runs_mut)
    }

    /// Check if this paragraph uses a heading style
    pub fn is_heading(&self) -> bool {
        self.style()
            .map(|s| s.starts_with("Heading") || s.starts_with("heading"))
            .unwrap_or(false)
    }

    /// Section this paragraph ends, if any
    pub fn section(&self) -> Option<&SectionProperties> {
        self.properties.section.as_ref()
    }

    /// Add a run
    pub fn add_run(&mut self, run: Run) {
        self.content.push(ParagraphContent::Run(run));
    }

    /// Set style ID
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.properties.style = Some(style.into());
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:p");
        start
            .opt_attr("w14:paraId", self.para_id)
            .opt_attr("w14:textId", self.text_id)
            .opt_attr("w:rsidR", self.rsid_r)
            .opt_attr("w:rsidRPr", self.rsid_r_pr)
            .opt_attr("w:rsidRDefault", self.rsid_r_default)
            .opt_attr("w:rsidP", self.rsid_p);

        if self.properties.is_empty() && self.content.is_empty() {
            return writer::empty(writer, start);
        }

        writer::start(writer, start)?;
        self.properties.write_to(writer)?;
        for content in &self.content {
            match content {
                ParagraphContent::Run(run) => run.write_to(writer)?,
                ParagraphContent::Hyperlink(link) => link.write_to(writer)?,
                ParagraphContent::SimpleField(field) => field.write_to(writer)?,
                ParagraphContent::BookmarkStart(b) => {
                    let mut elem = BytesStart::new("w:bookmarkStart");
                    elem.attr("w:id", &b.id).attr("w:name", &b.name);
                    writer::empty(writer, elem)?;
                }
                ParagraphContent::BookmarkEnd(b) => {
                    let mut elem = BytesStart::new("w:bookmarkEnd");
                    elem.attr("w:id", &b.id);
                    writer::empty(writer, elem)?;
                }
                ParagraphContent::Unknown(raw) => raw.write_to(writer)?,
            }
        }
        writer::end(writer, "w:p")
    }
}

impl ParagraphContent {
    /// Runs carried by this entry
    pub fn runs(&self) -> &[Run] {
        match self {
            ParagraphContent::Run(run) => std::slice::from_ref(run),
            ParagraphContent::Hyperlink(link) => &link.runs,
            ParagraphContent::SimpleField(field) => &field.runs,
            _ => &[],
        }
    }

    pub fn runs_mut(&mut self) -> &mut [Run] {
        match self {
            ParagraphContent::Run(run) => std::slice::from_mut(run),
            ParagraphContent::Hyperlink(link) => &mut link.runs,
            ParagraphContent::SimpleField(field) => &mut field.runs,
            _ => &mut [],
        }
    }
}

impl Hyperlink {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut link = Hyperlink {
            r_id: el.string(Ns::R, "id"),
            anchor: el.string(Ns::W, "anchor"),
            tooltip: el.string(Ns::W, "tooltip"),
            history: r.bool_attr(el, Ns::W, "history")?,
            runs: Vec::new(),
        };
        r.children(el, |r, child| {
            if (child.ns, child.local()) == (Ns::W, b"r".as_slice()) {
                link.runs.push(Run::decode(r, child)?);
                return Ok(true);
            }
            Ok(false)
        })?;
        Ok(link)
    }

    /// Plain text of the link
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:hyperlink");
        start
            .opt_attr("r:id", self.r_id.as_deref())
            .opt_attr("w:anchor", self.anchor.as_deref())
            .opt_attr("w:tooltip", self.tooltip.as_deref())
            .bool_attr("w:history", self.history);
        writer::start(writer, start)?;
        for run in &self.runs {
            run.write_to(writer)?;
        }
        writer::end(writer, "w:hyperlink")
    }
}

impl SimpleField {
    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut field = SimpleField {
            instr: el.string(Ns::W, "instr").unwrap_or_default(),
            dirty: r.bool_attr(el, Ns::W, "dirty")?,
            runs: Vec::new(),
        };
        r.children(el, |r, child| {
            if (child.ns, child.local()) == (Ns::W, b"r".as_slice()) {
                field.runs.push(Run::decode(r, child)?);
                return Ok(true);
            }
            Ok(false)
        })?;
        Ok(field)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:fldSimple");
        start.attr("w:instr", &self.instr).bool_attr("w:dirty", self.dirty);
        if self.runs.is_empty() {
            return writer::empty(writer, start);
        }
        writer::start(writer, start)?;
        for run in &self.runs {
            run.write_to(writer)?;
        }
        writer::end(writer, "w:fldSimple")
    }
}
