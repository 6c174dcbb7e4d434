//! Run element (w:r) and its content

use crate::document::RunProperties;
use crate::drawing::{AlternateContent, Drawing, Pict};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, XmlEnum};
use crate::xml::{Element, LongHexNum, Ns, OptBool, PartReader, RawXmlElement};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `w:br/@w:type`
    pub enum BreakType {
        TextWrapping => "textWrapping",
        Page => "page",
        Column => "column",
    }
}

xml_enum! {
    /// `w:br/@w:clear`
    pub enum BreakClear {
        None => "none",
        Left => "left",
        Right => "right",
        All => "all",
    }
}

xml_enum! {
    /// `w:fldChar/@w:fldCharType`
    pub enum FieldCharType {
        Begin => "begin",
        Separate => "separate",
        End => "end",
    }
}

xml_enum! {
    /// `w:ptab/@w:alignment`
    pub enum PTabAlignment {
        Left => "left",
        Center => "center",
        Right => "right",
    }
}

xml_enum! {
    /// `w:ptab/@w:relativeTo`
    pub enum PTabRelativeTo {
        Margin => "margin",
        Indent => "indent",
    }
}

xml_enum! {
    /// `w:ptab/@w:leader`
    pub enum PTabLeader {
        None => "none",
        Dot => "dot",
        Hyphen => "hyphen",
        Underscore => "underscore",
        MiddleDot => "middleDot",
    }
}

/// Character data of `w:t` or `w:instrText`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunText {
    pub text: String,
    /// Raw `xml:space` value
    pub space: Option<String>,
}

impl RunText {
    /// Text with `xml:space="preserve"` set when the text needs it
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let space = needs_preserve(&text).then(|| "preserve".to_string());
        Self { text, space }
    }

    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let space = el.xml_space().map(str::to_string);
        Ok(Self {
            text: r.text(el)?,
            space,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        let space = match &self.space {
            Some(space) => Some(space.as_str()),
            None => needs_preserve(&self.text).then_some("preserve"),
        };
        let mut elem = BytesStart::new(name);
        elem.opt_attr("xml:space", space);
        writer::start(writer, elem)?;
        writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        writer::end(writer, name)
    }
}

fn needs_preserve(text: &str) -> bool {
    text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains("  ")
}

/// `w:br`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Break {
    /// Absent means a text-wrapping break
    pub break_type: Option<BreakType>,
    pub clear: Option<BreakClear>,
}

impl Break {
    pub fn page() -> Self {
        Self {
            break_type: Some(BreakType::Page),
            clear: None,
        }
    }

    pub fn is_page(&self) -> bool {
        self.break_type == Some(BreakType::Page)
    }
}

/// `w:ptab`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionalTab {
    pub alignment: PTabAlignment,
    pub relative_to: PTabRelativeTo,
    pub leader: PTabLeader,
}

/// `w:fldChar`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldChar {
    pub char_type: FieldCharType,
    pub dirty: OptBool,
    pub lock: OptBool,
}

/// Content of a run, one payload per entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunContent {
    /// `w:t`
    Text(RunText),
    /// `w:tab`
    Tab,
    /// `w:ptab`
    PTab(PositionalTab),
    /// `w:cr`
    CarriageReturn,
    /// `w:br`
    Break(Break),
    /// `w:drawing`
    Drawing(Drawing),
    /// `mc:AlternateContent`
    AlternateContent(AlternateContent),
    /// `w:pict`
    Pict(Pict),
    /// `w:fldChar`
    FieldChar(FieldChar),
    /// `w:instrText`
    InstrText(RunText),
    /// `w:softHyphen`
    SoftHyphen,
    /// `w:noBreakHyphen`
    NoBreakHyphen,
    /// `w:lastRenderedPageBreak`
    LastRenderedPageBreak,
    /// Unmodelled element, kept verbatim
    Unknown(RawXmlElement),
}

impl RunContent {
    /// Tabs, carriage returns and breaks separate text without a space
    pub fn is_separator(&self) -> bool {
        matches!(
            self,
            RunContent::Tab | RunContent::PTab(_) | RunContent::CarriageReturn | RunContent::Break(_)
        )
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            RunContent::Text(text) => text.write_to(writer, "w:t"),
            RunContent::Tab => writer::empty(writer, BytesStart::new("w:tab")),
            RunContent::PTab(ptab) => {
                let mut elem = BytesStart::new("w:ptab");
                elem.attr("w:alignment", &ptab.alignment)
                    .attr("w:relativeTo", &ptab.relative_to)
                    .attr("w:leader", &ptab.leader);
                writer::empty(writer, elem)
            }
            RunContent::CarriageReturn => writer::empty(writer, BytesStart::new("w:cr")),
            RunContent::Break(br) => {
                let mut elem = BytesStart::new("w:br");
                elem.opt_attr("w:type", br.break_type.as_ref().map(XmlEnum::as_str))
                    .opt_attr("w:clear", br.clear.as_ref().map(XmlEnum::as_str));
                writer::empty(writer, elem)
            }
            RunContent::Drawing(drawing) => drawing.write_to(writer),
            RunContent::AlternateContent(alt) => alt.write_to(writer),
            RunContent::Pict(pict) => pict.write_to(writer),
            RunContent::FieldChar(fld) => {
                let mut elem = BytesStart::new("w:fldChar");
                elem.attr("w:fldCharType", &fld.char_type)
                    .bool_attr("w:dirty", fld.dirty)
                    .bool_attr("w:fldLock", fld.lock);
                writer::empty(writer, elem)
            }
            RunContent::InstrText(text) => text.write_to(writer, "w:instrText"),
            RunContent::SoftHyphen => writer::empty(writer, BytesStart::new("w:softHyphen")),
            RunContent::NoBreakHyphen => writer::empty(writer, BytesStart::new("w:noBreakHyphen")),
            RunContent::LastRenderedPageBreak => {
                writer::empty(writer, BytesStart::new("w:lastRenderedPageBreak"))
            }
            RunContent::Unknown(raw) => raw.write_to(writer),
        }
    }
}

/// Run element (w:r)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Run {
    pub rsid_r: Option<LongHexNum>,
    pub rsid_r_pr: Option<LongHexNum>,
    pub rsid_del: Option<LongHexNum>,
    pub properties: RunProperties,
    pub content: Vec<RunContent>,
}

impl Run {
    /// Create a new run with text
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            content: vec![RunContent::Text(RunText::new(text))],
            ..Default::default()
        }
    }

    /// Run holding a single drawing
    pub fn with_drawing(drawing: impl Into<Drawing>) -> Self {
        Run {
            content: vec![RunContent::Drawing(drawing.into())],
            ..Default::default()
        }
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut run = Run {
            rsid_r: r.hex_attr(el, Ns::W, "rsidR")?,
            rsid_r_pr: r.hex_attr(el, Ns::W, "rsidRPr")?,
            rsid_del: r.hex_attr(el, Ns::W, "rsidDel")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            let content = match (child.ns, child.local()) {
                (Ns::W, b"rPr") => {
                    run.properties = RunProperties::decode(r, child)?;
                    return Ok(true);
                }
                (Ns::W, b"t") => RunContent::Text(RunText::decode(r, child)?),
                (Ns::W, b"instrText") => RunContent::InstrText(RunText::decode(r, child)?),
                (Ns::W, b"drawing") => RunContent::Drawing(Drawing::decode(r, child)?),
                (Ns::W, b"pict") => RunContent::Pict(Pict::decode(r, child)?),
                (Ns::Mc, b"AlternateContent") => {
                    RunContent::AlternateContent(AlternateContent::decode(r, child)?)
                }
                (Ns::W, b"tab") => leaf(r, child, RunContent::Tab)?,
                (Ns::W, b"cr") => leaf(r, child, RunContent::CarriageReturn)?,
                (Ns::W, b"softHyphen") => leaf(r, child, RunContent::SoftHyphen)?,
                (Ns::W, b"noBreakHyphen") => leaf(r, child, RunContent::NoBreakHyphen)?,
                (Ns::W, b"lastRenderedPageBreak") => {
                    leaf(r, child, RunContent::LastRenderedPageBreak)?
                }
                (Ns::W, b"br") => {
                    let br = Break {
                        break_type: r.enum_attr(child, Ns::W, "type")?,
                        clear: r.enum_attr(child, Ns::W, "clear")?,
                    };
                    leaf(r, child, RunContent::Break(br))?
                }
                (Ns::W, b"ptab") => {
                    let ptab = PositionalTab {
                        alignment: r.enum_attr(child, Ns::W, "alignment")?.unwrap_or(PTabAlignment::Left),
                        relative_to: r
                            .enum_attr(child, Ns::W, "relativeTo")?
                            .unwrap_or(PTabRelativeTo::Margin),
                        leader: r.enum_attr(child, Ns::W, "leader")?.unwrap_or(PTabLeader::None),
                    };
                    leaf(r, child, RunContent::PTab(ptab))?
                }
                (Ns::W, b"fldChar") => {
                    let char_type = r
                        .enum_attr(child, Ns::W, "fldCharType")?
                        .ok_or_else(|| r.malformed(Some(child.name()), "fldChar without fldCharType"))?;
                    let fld = FieldChar {
                        char_type,
                        dirty: r.bool_attr(child, Ns::W, "dirty")?,
                        lock: r.bool_attr(child, Ns::W, "fldLock")?,
                    };
                    leaf(r, child, RunContent::FieldChar(fld))?
                }
                _ => RunContent::Unknown(RawXmlElement::read(r, child)?),
            };
            run.content.push(content);
            Ok(true)
        })?;

        Ok(run)
    }

    /// Get all text in this run
    pub fn text(&self) -> String {
        let mut result = String::new();
        for content in &self.content {
            match content {
                RunContent::Text(t) => result.push_str(&t.text),
                RunContent::Tab | RunContent::PTab(_) => result.push('\t'),
                RunContent::CarriageReturn => result.push('\n'),
                RunContent::Break(br) if br.break_type.is_none() => result.push('\n'),
                RunContent::NoBreakHyphen => result.push('-'),
                _ => {}
            }
        }
        result
    }

    /// Check if bold
    pub fn bold(&self) -> bool {
        self.properties.bold.unwrap_or(false)
    }

    /// Check if italic
    pub fn italic(&self) -> bool {
        self.properties.italic.unwrap_or(false)
    }

    /// Get font size in points (None if not specified)
    pub fn font_size_pt(&self) -> Option<f32> {
        self.properties.size.map(|s| s as f32 / 2.0)
    }

    /// Get color (RGB hex string)
    pub fn color(&self) -> Option<&str> {
        self.properties.color.as_deref()
    }

    /// Drawings directly in this run
    pub fn drawings(&self) -> impl Iterator<Item = &Drawing> {
        self.content.iter().filter_map(|c| match c {
            RunContent::Drawing(d) => Some(d),
            _ => None,
        })
    }

    /// Set bold
    pub fn set_bold(&mut self, bold: bool) {
        self.properties.bold = Some(bold);
    }

    /// Set italic
    pub fn set_italic(&mut self, italic: bool) {
        self.properties.italic = Some(italic);
    }

    /// Set font size in points
    pub fn set_font_size_pt(&mut self, size: f32) {
        self.properties.size = Some((size * 2.0) as u32);
    }

    /// Set color (RGB hex string)
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.properties.color = Some(color.into());
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:r");
        start
            .opt_attr("w:rsidR", self.rsid_r)
            .opt_attr("w:rsidRPr", self.rsid_r_pr)
            .opt_attr("w:rsidDel", self.rsid_del);

        if self.properties.is_empty() && self.content.is_empty() {
            return writer::empty(writer, start);
        }

        writer::start(writer, start)?;
        self.properties.write_to(writer)?;
        for content in &self.content {
            content.write_to(writer)?;
        }
        writer::end(writer, "w:r")
    }
}

/// Attribute-only child: consume it and return `content`
fn leaf<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>, content: RunContent) -> Result<RunContent> {
    r.skip(el)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::McContent;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    fn decode(inner: &str) -> Run {
        let xml = format!(
            r#"<w:r xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
                    xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"
                    xmlns:v="urn:schemas-microsoft-com:vml" w:rsidR="00A1B2C3">{}</w:r>"#,
            inner
        );
        let mut r = PartReader::from_bytes("/r.xml", xml.as_bytes(), false);
        r.read_root((Ns::W, b"r"), |r, el| Run::decode(r, el)).unwrap()
    }

    #[test]
    fn test_decode_content_in_order() {
        let run = decode(
            r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Hello </w:t><w:tab/><w:t>World</w:t>
               <w:br w:type="page"/><w:fldChar w:fldCharType="begin" w:dirty="true"/>
               <w:instrText xml:space="preserve"> PAGE </w:instrText><w:fldChar w:fldCharType="end"/>
               <w:proofErr w:type="spellStart"/>"#,
        );

        assert_eq!(run.rsid_r, Some(LongHexNum(0xA1B2C3)));
        assert!(run.bold());
        assert_eq!(run.content.len(), 8);
        assert_eq!(
            run.content[0],
            RunContent::Text(RunText {
                text: "Hello ".into(),
                space: Some("preserve".into()),
            })
        );
        assert_eq!(run.content[1], RunContent::Tab);
        assert!(matches!(&run.content[3], RunContent::Break(br) if br.is_page()));
        assert!(matches!(
            &run.content[4],
            RunContent::FieldChar(FieldChar { char_type: FieldCharType::Begin, dirty, .. }) if dirty.is_true()
        ));
        assert!(matches!(&run.content[5], RunContent::InstrText(t) if t.text == " PAGE "));
        assert!(matches!(&run.content[7], RunContent::Unknown(raw) if raw.name == "w:proofErr"));
        assert_eq!(run.text(), "Hello \tWorld");
    }

    #[test]
    fn test_decode_alternate_content() {
        let run = decode(
            r#"<mc:AlternateContent><mc:Choice Requires="wps"><w:bogus/></mc:Choice>
               <mc:Fallback><w:pict><v:rect/></w:pict></mc:Fallback></mc:AlternateContent>"#,
        );
        match &run.content[0] {
            RunContent::AlternateContent(alt) => {
                assert!(matches!(alt.preferred(), Some(McContent::Pict(_))))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_write_run() {
        let mut run = Run::new(" spaced");
        run.set_bold(true);
        run.content.push(RunContent::Break(Break::page()));

        let xml = to_xml_string(|w| run.write_to(w)).unwrap();
        assert_eq!(
            xml,
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve"> spaced</w:t><w:br w:type="page"/></w:r>"#
        );
    }

    #[test]
    fn test_raw_space_value_kept() {
        let run = decode(r#"<w:t xml:space="default">a</w:t>"#);
        let xml = to_xml_string(|w| run.write_to(w)).unwrap();
        assert!(xml.contains(r#"<w:t xml:space="default">a</w:t>"#));
    }

    #[test]
    fn test_fld_char_requires_type() {
        let xml = r#"<w:r xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:fldChar/></w:r>"#;
        let mut r = PartReader::from_bytes("/r.xml", xml.as_bytes(), false);
        assert!(r.read_root((Ns::W, b"r"), |r, el| Run::decode(r, el)).is_err());
    }
}
