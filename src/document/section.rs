//! Section properties (w:sectPr)
//!
//! A `sectPr` inside a paragraph's properties ends a section at that
//! paragraph; the body's trailing `sectPr` describes the last section.

use crate::document::numbering::NumberFormat;
use crate::error::Result;
use crate::xml::writer::{self, StartExt};
use crate::xml::{xml_enum, XmlEnum};
use crate::xml::{Element, LongHexNum, Ns, OptBool, PartReader, RawXmlElement};
use quick_xml::events::BytesStart;
use quick_xml::Writer;
use std::io::{BufRead, Write};

xml_enum! {
    /// `w:headerReference/@w:type` and `w:footerReference/@w:type`
    pub enum HeaderFooterType {
        Default => "default",
        First => "first",
        Even => "even",
    }
}

xml_enum! {
    /// `w:type/@w:val`: how the section starts
    pub enum SectionMark {
        NextPage => "nextPage",
        NextColumn => "nextColumn",
        Continuous => "continuous",
        EvenPage => "evenPage",
        OddPage => "oddPage",
    }
}

xml_enum! {
    pub enum PageOrientation {
        Portrait => "portrait",
        Landscape => "landscape",
    }
}

xml_enum! {
    /// `w:textDirection/@w:val`
    pub enum TextDirection {
        LrTb => "lrTb",
        TbRl => "tbRl",
        BtLr => "btLr",
        LrTbV => "lrTbV",
        TbRlV => "tbRlV",
        TbLrV => "tbLrV",
    }
}

xml_enum! {
    /// `w:docGrid/@w:type`
    pub enum DocGridType {
        Default => "default",
        Lines => "lines",
        LinesAndChars => "linesAndChars",
        SnapToChars => "snapToChars",
    }
}

/// Header or footer reference of a section
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderFooterRef {
    pub kind: HeaderFooterType,
    /// Relationship id in the document part's relationships
    pub r_id: String,
}

/// `w:pgSz`, in twips
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageSize {
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub orient: Option<PageOrientation>,
}

/// `w:pgMar`, in twips
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageMargins {
    pub top: i32,
    pub right: u32,
    pub bottom: i32,
    pub left: u32,
    pub header: u32,
    pub footer: u32,
    pub gutter: u32,
}

/// `w:pgNumType`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageNumbering {
    pub fmt: Option<NumberFormat>,
    pub start: Option<u32>,
}

/// `w:col`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Column {
    pub w: Option<u32>,
    pub space: Option<u32>,
}

/// `w:cols`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Columns {
    pub space: Option<u32>,
    pub num: Option<u32>,
    pub equal_width: OptBool,
    /// Explicit columns when widths differ
    pub columns: Vec<Column>,
}

/// `w:docGrid`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocGrid {
    pub grid_type: Option<DocGridType>,
    pub line_pitch: Option<i32>,
    pub char_space: Option<i32>,
}

/// Section properties
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionProperties {
    pub rsid_r: Option<LongHexNum>,
    pub rsid_r_pr: Option<LongHexNum>,
    pub rsid_sect: Option<LongHexNum>,
    pub headers: Vec<HeaderFooterRef>,
    pub footers: Vec<HeaderFooterRef>,
    pub section_type: Option<SectionMark>,
    pub page_size: Option<PageSize>,
    pub page_margins: Option<PageMargins>,
    /// `w:pgBorders`, kept verbatim
    pub page_borders: Option<RawXmlElement>,
    pub page_numbering: Option<PageNumbering>,
    pub columns: Option<Columns>,
    pub form_protection: Option<bool>,
    /// Distinct first-page header and footer
    pub title_page: Option<bool>,
    pub text_direction: Option<TextDirection>,
    pub doc_grid: Option<DocGrid>,
    pub unknown_children: Vec<RawXmlElement>,
}

const ORDER: &[&str] = &[
    "headerReference",
    "footerReference",
    "footnotePr",
    "endnotePr",
    "type",
    "pgSz",
    "pgMar",
    "paperSrc",
    "pgBorders",
    "lnNumType",
    "pgNumType",
    "cols",
    "formProt",
    "vAlign",
    "noEndnote",
    "titlePg",
    "textDirection",
    "bidi",
    "rtlGutter",
    "docGrid",
    "printerSettings",
    "sectPrChange",
];

impl SectionProperties {
    /// US Letter portrait with one-inch margins
    pub fn letter() -> Self {
        Self {
            page_size: Some(PageSize {
                w: Some(12240),
                h: Some(15840),
                orient: None,
            }),
            page_margins: Some(PageMargins {
                top: 1440,
                right: 1440,
                bottom: 1440,
                left: 1440,
                header: 720,
                footer: 720,
                gutter: 0,
            }),
            columns: Some(Columns {
                space: Some(720),
                ..Default::default()
            }),
            doc_grid: Some(DocGrid {
                line_pitch: Some(360),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Relationship id of the header of `kind`
    pub fn header_ref(&self, kind: &HeaderFooterType) -> Option<&str> {
        find_ref(&self.headers, kind)
    }

    /// Relationship id of the footer of `kind`
    pub fn footer_ref(&self, kind: &HeaderFooterType) -> Option<&str> {
        find_ref(&self.footers, kind)
    }

    pub(crate) fn decode<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Self> {
        let mut sect = Self {
            rsid_r: r.hex_attr(el, Ns::W, "rsidR")?,
            rsid_r_pr: r.hex_attr(el, Ns::W, "rsidRPr")?,
            rsid_sect: r.hex_attr(el, Ns::W, "rsidSect")?,
            ..Default::default()
        };

        r.children(el, |r, child| {
            if child.ns != Ns::W {
                sect.unknown_children.push(RawXmlElement::read(r, child)?);
                return Ok(true);
            }
            match child.local() {
                b"headerReference" => sect.headers.push(decode_ref(r, child)?),
                b"footerReference" => sect.footers.push(decode_ref(r, child)?),
                b"type" => sect.section_type = r.enum_val(child)?,
                b"pgSz" => {
                    sect.page_size = Some(PageSize {
                        w: r.num_attr(child, Ns::W, "w")?,
                        h: r.num_attr(child, Ns::W, "h")?,
                        orient: r.enum_attr(child, Ns::W, "orient")?,
                    })
                }
                b"pgMar" => {
                    sect.page_margins = Some(PageMargins {
                        top: r.num_attr(child, Ns::W, "top")?.unwrap_or(0),
                        right: r.num_attr(child, Ns::W, "right")?.unwrap_or(0),
                        bottom: r.num_attr(child, Ns::W, "bottom")?.unwrap_or(0),
                        left: r.num_attr(child, Ns::W, "left")?.unwrap_or(0),
                        header: r.num_attr(child, Ns::W, "header")?.unwrap_or(0),
                        footer: r.num_attr(child, Ns::W, "footer")?.unwrap_or(0),
                        gutter: r.num_attr(child, Ns::W, "gutter")?.unwrap_or(0),
                    })
                }
                b"pgBorders" => {
                    sect.page_borders = Some(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
                b"pgNumType" => {
                    sect.page_numbering = Some(PageNumbering {
                        fmt: r.enum_attr(child, Ns::W, "fmt")?,
                        start: r.num_attr(child, Ns::W, "start")?,
                    })
                }
                b"cols" => {
                    sect.columns = Some(decode_columns(r, child)?);
                    return Ok(true);
                }
                b"formProt" => sect.form_protection = Some(r.toggle(child)?),
                b"titlePg" => sect.title_page = Some(r.toggle(child)?),
                b"textDirection" => sect.text_direction = r.enum_val(child)?,
                b"docGrid" => {
                    sect.doc_grid = Some(DocGrid {
                        grid_type: r.enum_attr(child, Ns::W, "type")?,
                        line_pitch: r.num_attr(child, Ns::W, "linePitch")?,
                        char_space: r.num_attr(child, Ns::W, "charSpace")?,
                    })
                }
                _ => {
                    sect.unknown_children.push(RawXmlElement::read(r, child)?);
                    return Ok(true);
                }
            }
            r.skip(child)?;
            Ok(true)
        })?;

        Ok(sect)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:sectPr");
        start
            .opt_attr("w:rsidR", self.rsid_r)
            .opt_attr("w:rsidRPr", self.rsid_r_pr)
            .opt_attr("w:rsidSect", self.rsid_sect);
        writer::start(writer, start)?;
        writer::write_in_order(writer, ORDER, &self.unknown_children, |w, name| {
            self.write_child(w, name)
        })?;
        writer::end(writer, "w:sectPr")
    }

    fn write_child<W: Write>(&self, w: &mut Writer<W>, name: &str) -> Result<()> {
        match name {
            "headerReference" => write_refs(w, "w:headerReference", &self.headers),
            "footerReference" => write_refs(w, "w:footerReference", &self.footers),
            "type" => writer::write_opt_val(w, "w:type", self.section_type.as_ref()),
            "pgSz" => match &self.page_size {
                Some(size) => {
                    let mut elem = BytesStart::new("w:pgSz");
                    elem.opt_attr("w:w", size.w)
                        .opt_attr("w:h", size.h)
                        .opt_attr("w:orient", size.orient.as_ref().map(XmlEnum::as_str));
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            "pgMar" => match &self.page_margins {
                Some(m) => {
                    let mut elem = BytesStart::new("w:pgMar");
                    elem.attr("w:top", m.top)
                        .attr("w:right", m.right)
                        .attr("w:bottom", m.bottom)
                        .attr("w:left", m.left)
                        .attr("w:header", m.header)
                        .attr("w:footer", m.footer)
                        .attr("w:gutter", m.gutter);
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            "pgBorders" => match &self.page_borders {
                Some(raw) => raw.write_to(w),
                None => Ok(()),
            },
            "pgNumType" => match &self.page_numbering {
                Some(num) => {
                    let mut elem = BytesStart::new("w:pgNumType");
                    elem.opt_attr("w:fmt", num.fmt.as_ref().map(XmlEnum::as_str))
                        .opt_attr("w:start", num.start);
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            "cols" => match &self.columns {
                Some(cols) => write_columns(w, cols),
                None => Ok(()),
            },
            "formProt" => writer::write_toggle(w, "w:formProt", self.form_protection),
            "titlePg" => writer::write_toggle(w, "w:titlePg", self.title_page),
            "textDirection" => writer::write_opt_val(w, "w:textDirection", self.text_direction.as_ref()),
            "docGrid" => match &self.doc_grid {
                Some(grid) => {
                    let mut elem = BytesStart::new("w:docGrid");
                    elem.opt_attr("w:type", grid.grid_type.as_ref().map(XmlEnum::as_str))
                        .opt_attr("w:linePitch", grid.line_pitch)
                        .opt_attr("w:charSpace", grid.char_space);
                    writer::empty(w, elem)
                }
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

fn find_ref<'a>(refs: &'a [HeaderFooterRef], kind: &HeaderFooterType) -> Option<&'a str> {
    refs.iter()
        .find(|r| &r.kind == kind)
        .map(|r| r.r_id.as_str())
}

fn decode_ref<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<HeaderFooterRef> {
    let r_id = el
        .string(Ns::R, "id")
        .ok_or_else(|| r.malformed(Some(el.name()), "reference without r:id"))?;
    Ok(HeaderFooterRef {
        kind: r.enum_attr(el, Ns::W, "type")?.unwrap_or(HeaderFooterType::Default),
        r_id,
    })
}

fn write_refs<W: Write>(w: &mut Writer<W>, name: &str, refs: &[HeaderFooterRef]) -> Result<()> {
    for reference in refs {
        let mut elem = BytesStart::new(name);
        elem.attr("w:type", &reference.kind).attr("r:id", &reference.r_id);
        writer::empty(w, elem)?;
    }
    Ok(())
}

fn decode_columns<R: BufRead>(r: &mut PartReader<R>, el: &Element<'_>) -> Result<Columns> {
    let mut cols = Columns {
        space: r.num_attr(el, Ns::W, "space")?,
        num: r.num_attr(el, Ns::W, "num")?,
        equal_width: r.bool_attr(el, Ns::W, "equalWidth")?,
        columns: Vec::new(),
    };
    r.children(el, |r, child| {
        if (child.ns, child.local()) == (Ns::W, b"col".as_slice()) {
            cols.columns.push(Column {
                w: r.num_attr(child, Ns::W, "w")?,
                space: r.num_attr(child, Ns::W, "space")?,
            });
        }
        Ok(false)
    })?;
    Ok(cols)
}

fn write_columns<W: Write>(w: &mut Writer<W>, cols: &Columns) -> Result<()> {
    let mut elem = BytesStart::new("w:cols");
    elem.opt_attr("w:space", cols.space)
        .opt_attr("w:num", cols.num)
        .bool_attr("w:equalWidth", cols.equal_width);
    if cols.columns.is_empty() {
        return writer::empty(w, elem);
    }
    writer::start(w, elem)?;
    for col in &cols.columns {
        let mut c = BytesStart::new("w:col");
        c.opt_attr("w:w", col.w).opt_attr("w:space", col.space);
        writer::empty(w, c)?;
    }
    writer::end(w, "w:cols")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;
    use pretty_assertions::assert_eq;

    const SECT: &str = r#"<w:sectPr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
        xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" w:rsidR="00C4D1E2">
      <w:footerReference w:type="default" r:id="rId9"/>
      <w:headerReference w:type="first" r:id="rId7"/>
      <w:headerReference w:type="default" r:id="rId8"/>
      <w:type w:val="continuous"/>
      <w:pgSz w:w="11906" w:h="16838" w:orient="portrait"/>
      <w:pgMar w:top="1440" w:right="1800" w:bottom="1440" w:left="1800" w:header="851" w:footer="992" w:gutter="0"/>
      <w:pgNumType w:fmt="lowerRoman" w:start="1"/>
      <w:cols w:num="2" w:space="425" w:equalWidth="0"><w:col w:w="4000" w:space="425"/><w:col w:w="3881"/></w:cols>
      <w:titlePg/>
      <w:docGrid w:type="lines" w:linePitch="312"/>
    </w:sectPr>"#;

    fn decode(xml: &str) -> SectionProperties {
        let mut r = PartReader::from_bytes("/s.xml", xml.as_bytes(), false);
        r.read_root((Ns::W, b"sectPr"), |r, el| SectionProperties::decode(r, el))
            .unwrap()
    }

    #[test]
    fn test_decode_section() {
        let sect = decode(SECT);

        assert_eq!(sect.rsid_r, Some(LongHexNum(0xC4D1E2)));
        assert_eq!(sect.header_ref(&HeaderFooterType::First), Some("rId7"));
        assert_eq!(sect.header_ref(&HeaderFooterType::Default), Some("rId8"));
        assert_eq!(sect.footer_ref(&HeaderFooterType::Default), Some("rId9"));
        assert_eq!(sect.section_type, Some(SectionMark::Continuous));
        assert_eq!(sect.page_size.as_ref().unwrap().w, Some(11906));
        assert_eq!(sect.page_margins.as_ref().unwrap().header, 851);
        assert_eq!(
            sect.page_numbering,
            Some(PageNumbering {
                fmt: Some(NumberFormat::LowerRoman),
                start: Some(1),
            })
        );
        let cols = sect.columns.as_ref().unwrap();
        assert_eq!(cols.num, Some(2));
        assert_eq!(cols.equal_width, OptBool::FALSE);
        assert_eq!(cols.columns.len(), 2);
        assert_eq!(sect.title_page, Some(true));
        assert_eq!(sect.doc_grid.as_ref().unwrap().grid_type, Some(DocGridType::Lines));
    }

    #[test]
    fn test_encode_in_schema_order() {
        let sect = decode(SECT);
        let xml = to_xml_string(|w| sect.write_to(w)).unwrap();

        let order: Vec<usize> = [
            "<w:headerReference",
            "<w:footerReference",
            "<w:type ",
            "<w:pgSz",
            "<w:pgMar",
            "<w:pgNumType",
            "<w:cols",
            "<w:titlePg",
            "<w:docGrid",
        ]
        .iter()
        .map(|tag| xml.find(tag).unwrap())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(xml.contains(r#"<w:cols w:space="425" w:num="2" w:equalWidth="0"><w:col w:w="4000" w:space="425"/>"#));
    }

    #[test]
    fn test_letter_defaults() {
        let sect = SectionProperties::letter();
        let xml = to_xml_string(|w| sect.write_to(w)).unwrap();
        assert!(xml.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
        assert!(xml.contains(r#"w:header="720""#));
    }
}
