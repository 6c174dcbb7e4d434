//! Style definitions part (w:styles)

use crate::document::{ParagraphProperties, RunProperties};
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{self, xml_enum, XmlEnum};
use crate::xml::{Element, Ns, OptBool, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `w:style/@w:type`
    pub enum StyleType {
        Paragraph => "paragraph",
        Character => "character",
        Table => "table",
        Numbering => "numbering",
    }
}

/// One style definition (w:style)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub style_type: Option<StyleType>,
    pub style_id: String,
    /// Default style for its type
    pub default: OptBool,
    pub custom_style: OptBool,
    /// Display name
    pub name: Option<String>,
    pub based_on: Option<String>,
    /// Style for the following paragraph
    pub next: Option<String>,
    pub link: Option<String>,
    pub ui_priority: Option<u32>,
    pub q_format: Option<bool>,
    pub paragraph_properties: Option<ParagraphProperties>,
    pub run_properties: Option<RunProperties>,
    pub unknown_children: Vec<RawXmlElement>,
}

const STYLE_ORDER: &[&str] = &[
    "name",
    "aliases",
    "basedOn",
    "next",
    "link",
    "autoRedefine",
    "hidden",
    "uiPriority",
    "semiHidden",
    "unhideWhenUsed",
    "qFormat",
    "locked",
    "personal",
    "personalCompose",
    "personalReply",
    "rsid",
    "pPr",
    "rPr",
    "tblPr",
    "trPr",
    "tcPr",
    "tblStylePr",
];

impl Style {
    /// New style of the given type
    pub fn new(style_type: StyleType, style_id: impl Into<String>, name: impl Into<String>) -> Self {
        Style {
            style_type: Some(style_type),
            style_id: style_id.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut style = Style {
            style_type: r.enum_attr(el, Ns::W, "type")?,
            style_id: el.string(Ns::W, "styleId").unwrap_or_default(),
            default: r.bool_attr(el, Ns::W, "default")?,
            custom_style: r.bool_attr(el, Ns::W, "customStyle")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            if child.ns != Ns::W {
                style.unknown_children.push(RawXmlElement::read(r, child)?);
                return Ok(true);
            }
            match child.local() {
                b"name" => style.name = child.val().map(str::to_string),
                b"basedOn" => style.based_on = child.val().map(str::to_string),
                b"next" => style.next = child.val().map(str::to_string),
                b"link" => style.link = child.val().map(str::to_string),
                b"uiPriority" => style.ui_priority = r.num_val(child)?,
                b"qFormat" => style.q_format = Some(r.toggle(child)?),
                b"pPr" => {
                    style.paragraph_properties = Some(ParagraphProperties::decode(r, child)?);
                    return Ok(true);
                }
                b"rPr" => {
                    style.run_properties = Some(RunProperties::decode(r, child)?);
                    return Ok(true);
                }
                _ => {
                    style.unknown_children.push(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(style)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:style");
        start
            .opt_attr("w:type", self.style_type.as_ref().map(XmlEnum::as_str))
            .bool_attr("w:default", self.default)
            .bool_attr("w:customStyle", self.custom_style)
            .attr("w:styleId", &self.style_id);
        writer::start(writer, start)?;
        writer::write_in_order(writer, STYLE_ORDER, &self.unknown_children, |w, name| {
            match name {
                "name" => writer::write_opt_val(w, "w:name", self.name.as_deref()),
                "basedOn" => writer::write_opt_val(w, "w:basedOn", self.based_on.as_deref()),
                "next" => writer::write_opt_val(w, "w:next", self.next.as_deref()),
                "link" => writer::write_opt_val(w, "w:link", self.link.as_deref()),
                "uiPriority" => writer::write_opt_val(w, "w:uiPriority", self.ui_priority),
                "qFormat" => writer::write_toggle(w, "w:qFormat", self.q_format),
                // Written even when empty, a bare <w:pPr/> is meaningful here
                "pPr" => match &self.paragraph_properties {
                    Some(p) if p.is_empty() => writer::empty(w, BytesStart::new("w:pPr")),
                    Some(p) => p.write_to(w),
                    None => Ok(()),
                },
                "rPr" => match &self.run_properties {
                    Some(p) if p.is_empty() => writer::empty(w, BytesStart::new("w:rPr")),
                    Some(p) => p.write_to(w),
                    None => Ok(()),
                },
                _ => Ok(()),
            }
        })?;
        writer::end(writer, "w:style")
    }
}

/// The styles part
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Styles {
    /// Root attributes as parsed, namespace declarations included
    pub root_attributes: Vec<(String, String)>,
    /// `w:docDefaults`, kept verbatim
    pub doc_defaults: Option<RawXmlElement>,
    /// `w:latentStyles`, kept verbatim
    pub latent_styles: Option<RawXmlElement>,
    pub styles: Vec<Style>,
    pub unknown_children: Vec<RawXmlElement>,
}

impl Styles {
    /// A minimal styles part with a default paragraph style
    pub fn new() -> Self {
        let mut normal = Style::new(StyleType::Paragraph, "Normal", "Normal");
        normal.default = OptBool::TRUE;
        normal.q_format = Some(true);

        let mut font = Style::new(
            StyleType::Character,
            "DefaultParagraphFont",
            "Default Paragraph Font",
        );
        font.default = OptBool::TRUE;
        font.ui_priority = Some(1);

        Styles {
            styles: vec![normal, font],
            ..Default::default()
        }
    }

    /// Decode the styles part
    pub fn from_xml(part: &str, data: &[u8], strict: bool) -> Result<Self> {
        let mut r = PartReader::from_bytes(part, data, strict);
        r.read_root((Ns::W, b"styles"), |r, el| {
            let mut styles = Styles {
                root_attributes: el.raw_attributes(),
                ..Default::default()
            };
            r.children(el, |r, child| {
                match (child.ns, child.local()) {
                    (Ns::W, b"docDefaults") => styles.doc_defaults = Some(RawXmlElement::read(r, child)?),
                    (Ns::W, b"latentStyles") => {
                        styles.latent_styles = Some(RawXmlElement::read(r, child)?)
                    }
                    (Ns::W, b"style") => styles.styles.push(Style::decode(r, child)?),
                    _ => styles.unknown_children.push(RawXmlElement::read(r, child)?),
                }
                Ok(true)
            })?;
            Ok(styles)
        })
    }

    /// Encode the styles part
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        let mut attrs = self.root_attributes.clone();
        xml::complete_root_attributes(&mut attrs);

        writer::write_decl(&mut writer)?;
        let mut start = BytesStart::new("w:styles");
        for (key, value) in &attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer::start(&mut writer, start)?;
        if let Some(defaults) = &self.doc_defaults {
            defaults.write_to(&mut writer)?;
        }
        if let Some(latent) = &self.latent_styles {
            latent.write_to(&mut writer)?;
        }
        for style in &self.styles {
            style.write_to(&mut writer)?;
        }
        for child in &self.unknown_children {
            child.write_to(&mut writer)?;
        }
        writer::end(&mut writer, "w:styles")?;
        Ok(writer.into_inner())
    }

    /// Look up a style by id
    pub fn get(&self, style_id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.style_id == style_id)
    }

    /// Default style for a style type
    pub fn default_style(&self, style_type: &StyleType) -> Option<&Style> {
        self.styles
            .iter()
            .find(|s| s.style_type.as_ref() == Some(style_type) && s.default.is_true())
    }

    /// Chain of ids from `style_id` up through `basedOn`, stopping at cycles
    pub fn inheritance(&self, style_id: &str) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = self.get(style_id);
        while let Some(style) = current {
            if chain.contains(&style.style_id.as_str()) {
                break;
            }
            chain.push(&style.style_id);
            current = style.based_on.as_deref().and_then(|id| self.get(id));
        }
        chain
    }

    /// Add or replace a style by id
    pub fn add(&mut self, style: Style) {
        match self.styles.iter_mut().find(|s| s.style_id == style.style_id) {
            Some(existing) => *existing = style,
            None => self.styles.push(style),
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>
  <w:latentStyles w:defQFormat="0" w:count="376"><w:lsdException w:name="Normal" w:qFormat="1"/></w:latentStyles>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/>
    <w:pPr><w:keepNext/><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
  </w:style>
</w:styles>"#;

    #[test]
    fn test_lookup_and_inheritance() {
        let styles = Styles::from_xml("/word/styles.xml", STYLES.as_bytes(), true).unwrap();
        assert_eq!(styles.len(), 2);
        assert!(styles.doc_defaults.is_some());
        assert!(styles.latent_styles.is_some());

        let heading = styles.get("Heading1").unwrap();
        assert_eq!(heading.name.as_deref(), Some("heading 1"));
        assert_eq!(heading.run_properties.as_ref().unwrap().size, Some(32));
        assert_eq!(
            heading.paragraph_properties.as_ref().unwrap().outline_level,
            Some(0)
        );
        assert_eq!(styles.inheritance("Heading1"), vec!["Heading1", "Normal"]);
        assert_eq!(
            styles.default_style(&StyleType::Paragraph).map(|s| s.style_id.as_str()),
            Some("Normal")
        );
    }

    #[test]
    fn test_roundtrip() {
        let styles = Styles::from_xml("/word/styles.xml", STYLES.as_bytes(), true).unwrap();
        let bytes = styles.to_xml().unwrap();
        let again = Styles::from_xml("/word/styles.xml", &bytes, true).unwrap();
        assert_eq!(again.styles, styles.styles);
        assert_eq!(again.doc_defaults, styles.doc_defaults);
    }

    #[test]
    fn test_based_on_cycle_stops() {
        let mut styles = Styles::new();
        let mut a = Style::new(StyleType::Paragraph, "A", "A");
        a.based_on = Some("B".into());
        let mut b = Style::new(StyleType::Paragraph, "B", "B");
        b.based_on = Some("A".into());
        styles.add(a);
        styles.add(b);
        assert_eq!(styles.inheritance("A"), vec!["A", "B"]);
    }
}
