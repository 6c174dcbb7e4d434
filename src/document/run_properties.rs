//! Run formatting (w:rPr)

use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, XmlEnum};
use crate::xml::{Element, Ns, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `w:rFonts/@w:hint`
    pub enum FontHint {
        Default => "default",
        EastAsia => "eastAsia",
        ComplexScript => "cs",
    }
}

xml_enum! {
    /// `w:highlight/@w:val`
    pub enum Highlight {
        Black => "black",
        Blue => "blue",
        Cyan => "cyan",
        Green => "green",
        Magenta => "magenta",
        Red => "red",
        Yellow => "yellow",
        White => "white",
        DarkBlue => "darkBlue",
        DarkCyan => "darkCyan",
        DarkGreen => "darkGreen",
        DarkMagenta => "darkMagenta",
        DarkRed => "darkRed",
        DarkYellow => "darkYellow",
        DarkGray => "darkGray",
        LightGray => "lightGray",
        None => "none",
    }
}

xml_enum! {
    /// `w:u/@w:val`
    pub enum UnderlineType {
        Single => "single",
        Words => "words",
        Double => "double",
        Thick => "thick",
        Dotted => "dotted",
        DottedHeavy => "dottedHeavy",
        Dash => "dash",
        DashedHeavy => "dashedHeavy",
        DashLong => "dashLong",
        DashLongHeavy => "dashLongHeavy",
        DotDash => "dotDash",
        DashDotHeavy => "dashDotHeavy",
        DotDotDash => "dotDotDash",
        DashDotDotHeavy => "dashDotDotHeavy",
        Wave => "wave",
        WavyHeavy => "wavyHeavy",
        WavyDouble => "wavyDouble",
        None => "none",
    }
}

xml_enum! {
    /// `w:vertAlign/@w:val`
    pub enum VerticalAlignRun {
        Baseline => "baseline",
        Superscript => "superscript",
        Subscript => "subscript",
    }
}

/// `w:rFonts`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fonts {
    pub ascii: Option<String>,
    pub h_ansi: Option<String>,
    pub east_asia: Option<String>,
    pub cs: Option<String>,
    pub hint: Option<FontHint>,
}

/// `w:u`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Underline {
    pub val: Option<UnderlineType>,
    pub color: Option<String>,
}

/// `w:lang`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Language {
    pub val: Option<String>,
    pub east_asia: Option<String>,
    pub bidi: Option<String>,
}

/// Run properties.
///
/// Two runs format identically exactly when their properties compare equal,
/// which is what text merging relies on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunProperties {
    /// Character style id (`w:rStyle`)
    pub style: Option<String>,
    pub fonts: Option<Fonts>,
    pub bold: Option<bool>,
    pub bold_cs: Option<bool>,
    pub italic: Option<bool>,
    pub italic_cs: Option<bool>,
    pub caps: Option<bool>,
    pub small_caps: Option<bool>,
    pub strike: Option<bool>,
    pub dstrike: Option<bool>,
    pub vanish: Option<bool>,
    /// Hex RGB or `auto`
    pub color: Option<String>,
    /// Kerning threshold in half-points
    pub kern: Option<u32>,
    /// Size in half-points
    pub size: Option<u32>,
    pub size_cs: Option<u32>,
    pub highlight: Option<Highlight>,
    pub underline: Option<Underline>,
    pub vertical_align: Option<VerticalAlignRun>,
    pub lang: Option<Language>,
    /// Children this crate does not model, kept verbatim
    pub unknown_children: Vec<RawXmlElement>,
}

const ORDER: &[&str] = &[
    "rStyle",
    "rFonts",
    "b",
    "bCs",
    "i",
    "iCs",
    "caps",
    "smallCaps",
    "strike",
    "dstrike",
    "outline",
    "shadow",
    "emboss",
    "imprint",
    "noProof",
    "snapToGrid",
    "vanish",
    "webHidden",
    "color",
    "spacing",
    "w",
    "kern",
    "position",
    "sz",
    "szCs",
    "highlight",
    "u",
    "effect",
    "bdr",
    "shd",
    "fitText",
    "vertAlign",
    "rtl",
    "cs",
    "em",
    "lang",
    "eastAsianLayout",
    "specVanish",
    "oMath",
];

impl RunProperties {
    /// No property set at all
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
                b"rStyle" => props.style = child.val().map(str::to_string),
                b"rFonts" => {
                    props.fonts = Some(Fonts {
                        ascii: child.string(Ns::W, "ascii"),
                        h_ansi: child.string(Ns::W, "hAnsi"),
                        east_asia: child.string(Ns::W, "eastAsia"),
                        cs: child.string(Ns::W, "cs"),
                        hint: r.enum_attr(child, Ns::W, "hint")?,
                    })
                }
                b"b" => props.bold = Some(r.toggle(child)?),
                b"bCs" => props.bold_cs = Some(r.toggle(child)?),
                b"i" => props.italic = Some(r.toggle(child)?),
                b"iCs" => props.italic_cs = Some(r.toggle(child)?),
                b"caps" => props.caps = Some(r.toggle(child)?),
                b"smallCaps" => props.small_caps = Some(r.toggle(child)?),
                b"strike" => props.strike = Some(r.toggle(child)?),
                b"dstrike" => props.dstrike = Some(r.toggle(child)?),
                b"vanish" => props.vanish = Some(r.toggle(child)?),
                b"color" => props.color = child.val().map(str::to_string),
                b"kern" => props.kern = r.num_val(child)?,
                b"sz" => props.size = r.num_val(child)?,
                b"szCs" => props.size_cs = r.num_val(child)?,
                b"highlight" => props.highlight = r.enum_val(child)?,
                b"u" => {
                    props.underline = Some(Underline {
                        val: r.enum_val(child)?,
                        color: child.string(Ns::W, "color"),
                    })
                }
                b"vertAlign" => props.vertical_align = r.enum_val(child)?,
                b"lang" => {
                    props.lang = Some(Language {
                        val: child.val().map(str::to_string),
                        east_asia: child.string(Ns::W, "eastAsia"),
                        bidi: child.string(Ns::W, "bidi"),
                    })
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

    /// Write as `w:rPr`, or nothing when empty
    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        writer::start(writer, BytesStart::new("w:rPr"))?;
        writer::write_in_order(writer, ORDER, &self.unknown_children, |w, name| {
            self.write_child(w, name)
        })?;
        writer::end(writer, "w:rPr")
    }

    fn write_child<W: Write>(&self, w: &mut Writer<W>, name: &str) -> Result<()> {
        match name {
            "rStyle" => writer::write_opt_val(w, "w:rStyle", self.style.as_deref()),
            "rFonts" => match &self.fonts {
                Some(fonts) => {
                    let mut elem = BytesStart::new("w:rFonts");
                    elem.opt_attr("w:ascii", fonts.ascii.as_deref())
                        .opt_attr("w:hAnsi", fonts.h_ansi.as_deref())
                        .opt_attr("w:eastAsia", fonts.east_asia.as_deref())
                        .opt_attr("w:cs", fonts.cs.as_deref())
                        .opt_attr("w:hint", fonts.hint.as_ref().map(XmlEnum::as_str));
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            "b" => writer::write_toggle(w, "w:b", self.bold),
            "bCs" => writer::write_toggle(w, "w:bCs", self.bold_cs),
            "i" => writer::write_toggle(w, "w:i", self.italic),
            "iCs" => writer::write_toggle(w, "w:iCs", self.italic_cs),
            "caps" => writer::write_toggle(w, "w:caps", self.caps),
            "smallCaps" => writer::write_toggle(w, "w:smallCaps", self.small_caps),
            "strike" => writer::write_toggle(w, "w:strike", self.strike),
            "dstrike" => writer::write_toggle(w, "w:dstrike", self.dstrike),
            "vanish" => writer::write_toggle(w, "w:vanish", self.vanish),
            "color" => writer::write_opt_val(w, "w:color", self.color.as_deref()),
            "kern" => writer::write_opt_val(w, "w:kern", self.kern),
            "sz" => writer::write_opt_val(w, "w:sz", self.size),
            "szCs" => writer::write_opt_val(w, "w:szCs", self.size_cs),
            "highlight" => writer::write_opt_val(w, "w:highlight", self.highlight.as_ref()),
            "u" => match &self.underline {
                Some(u) => {
                    let mut elem = BytesStart::new("w:u");
                    elem.opt_attr("w:val", u.val.as_ref().map(XmlEnum::as_str))
                        .opt_attr("w:color", u.color.as_deref());
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            "vertAlign" => writer::write_opt_val(w, "w:vertAlign", self.vertical_align.as_ref()),
            "lang" => match &self.lang {
                Some(lang) => {
                    let mut elem = BytesStart::new("w:lang");
                    elem.opt_attr("w:val", lang.val.as_deref())
                        .opt_attr("w:eastAsia", lang.east_asia.as_deref())
                        .opt_attr("w:bidi", lang.bidi.as_deref());
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    fn decode(inner: &str) -> RunProperties {
        let xml = format!(
            r#"<w:rPr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
                      xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml">{}</w:rPr>"#,
            inner
        );
        let mut r = PartReader::from_bytes("/rpr.xml", xml.as_bytes(), false);
        r.read_root((Ns::W, b"rPr"), |r, el| RunProperties::decode(r, el))
            .unwrap()
    }

    #[test]
    fn test_decode_toggles_and_values() {
        let props = decode(
            r#"<w:rFonts w:ascii="Calibri" w:eastAsia="SimSun" w:hint="eastAsia"/>
               <w:b/><w:i w:val="false"/><w:color w:val="FF0000"/><w:sz w:val="28"/>
               <w:u w:val="double" w:color="00FF00"/><w:vertAlign w:val="superscript"/>"#,
        );

        assert_eq!(props.bold, Some(true));
        assert_eq!(props.italic, Some(false));
        assert_eq!(props.color.as_deref(), Some("FF0000"));
        assert_eq!(props.size, Some(28));
        assert_eq!(props.fonts.as_ref().unwrap().hint, Some(FontHint::EastAsia));
        assert_eq!(
            props.underline,
            Some(Underline {
                val: Some(UnderlineType::Double),
                color: Some("00FF00".into()),
            })
        );
        assert_eq!(props.vertical_align, Some(VerticalAlignRun::Superscript));
        assert!(props.unknown_children.is_empty());
    }

    #[test]
    fn test_unknown_children_keep_schema_position() {
        let props = decode(
            r#"<w14:textOutline w14:w="9525"/><w:noProof/><w:b/><w:shd w:val="clear" w:fill="FFFF00"/><w:sz w:val="20"/>"#,
        );
        assert_eq!(props.unknown_children.len(), 3);

        let xml = to_xml_string(|w| props.write_to(w)).unwrap();
        let b = xml.find("<w:b/>").unwrap();
        let no_proof = xml.find("<w:noProof/>").unwrap();
        let sz = xml.find("<w:sz ").unwrap();
        let shd = xml.find("<w:shd ").unwrap();
        let outline = xml.find("<w14:textOutline").unwrap();
        assert!(b < no_proof);
        assert!(sz < shd);
        assert!(shd < outline);
    }

    #[test]
    fn test_empty_properties_write_nothing() {
        let xml = to_xml_string(|w| RunProperties::default().write_to(w)).unwrap();
        assert_eq!(xml, "");
    }

    #[test]
    fn test_equality_is_structural() {
        let a = decode(r#"<w:b/><w:sz w:val="24"/>"#);
        let b = decode(r#"<w:sz w:val="24"/><w:b w:val="1"/>"#);
        let c = decode(r#"<w:b w:val="0"/><w:sz w:val="24"/>"#);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
