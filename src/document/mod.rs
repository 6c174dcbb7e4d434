//! Document model - the decoded WordprocessingML parts of a package

mod body;
mod header_footer;
mod load;
pub mod numbering;
mod paragraph;
mod run;
mod run_properties;
mod save;
mod section;
pub mod styles;
pub mod table;

pub use body::{BlockContent, Body};
pub use header_footer::{HeaderFooter, HeaderFooterKind};
pub use load::LoadStage;
pub use numbering::{Numbering, NumberFormat};
pub use paragraph::{
    BookmarkEnd, BookmarkStart, Hyperlink, Indentation, Justification, LineRule, NumberingRef,
    Paragraph, ParagraphContent, ParagraphProperties, SimpleField, Spacing,
};
pub use run::{
    Break, BreakClear, BreakType, FieldChar, FieldCharType, PTabAlignment, PTabLeader,
    PTabRelativeTo, PositionalTab, Run, RunContent, RunText,
};
pub use run_properties::{
    FontHint, Fonts, Highlight, Language, RunProperties, Underline, UnderlineType,
    VerticalAlignRun,
};
pub use section::{
    Column, Columns, DocGrid, DocGridType, HeaderFooterRef, HeaderFooterType, PageMargins,
    PageNumbering, PageOrientation, PageSize, SectionMark, SectionProperties, TextDirection,
};
pub use styles::{Style, StyleType, Styles};
pub use table::{Table, TableCell, TableRow};

use crate::error::{Error, Result};
use crate::opc::{self, rel_types, well_known, Package, Part, PartUri, Target};
use crate::options::LoadOptions;
use crate::projection::{Text, TextRoot};
use crate::xml::RawXmlElement;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::ops::Range;
use std::path::Path;

/// A DOCX document
#[derive(Debug)]
pub struct Document {
    /// Underlying OPC package; owns every part the model does not decode
    package: Package,
    document_uri: PartUri,
    /// Root attributes of `w:document`, namespace declarations included
    root_attributes: Vec<(String, String)>,
    /// `w:document` children other than the body
    extra_children: Vec<RawXmlElement>,
    body: Body,
    /// Headers by relationship id
    headers: BTreeMap<String, HeaderFooter>,
    /// Footers by relationship id
    footers: BTreeMap<String, HeaderFooter>,
    styles: Option<Styles>,
    numbering: Option<Numbering>,
}

/// One section: its properties and the body blocks it covers
#[derive(Clone, Debug, PartialEq)]
pub struct Section<'a> {
    /// `None` for trailing content of a body without a final `w:sectPr`
    pub properties: Option<&'a SectionProperties>,
    pub blocks: Range<usize>,
}

impl Document {
    /// Open a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &LoadOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let file = File::open(path)?;
        load::load(BufReader::new(file), options)
    }

    /// Load a document from package bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &LoadOptions::default())
    }

    pub fn from_bytes_with(bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        load::load(Cursor::new(bytes), options)
    }

    /// Create a new empty document with default styles and a Letter page
    pub fn new() -> Self {
        let document_uri = well_known::document();
        let mut package = Package::new();
        package.add_part(Part::new(document_uri.clone(), opc::MAIN_DOCUMENT, Vec::new()));
        package
            .relationships_mut()
            .add(rel_types::OFFICE_DOCUMENT, document_uri.relative_to(&PartUri::root()).as_str());

        Self {
            package,
            document_uri,
            root_attributes: Vec::new(),
            extra_children: Vec::new(),
            body: Body {
                content: Vec::new(),
                section: Some(SectionProperties::letter()),
            },
            headers: BTreeMap::new(),
            footers: BTreeMap::new(),
            styles: Some(Styles::new()),
            numbering: None,
        }
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.update_package()?;
        self.package.save(path)
    }

    /// Encode the document into package bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.update_package()?;
        self.package.to_bytes()
    }

    /// Get the underlying package
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// URI of the main document part
    pub fn document_uri(&self) -> &PartUri {
        &self.document_uri
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Top-level paragraphs of the body
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    /// Top-level tables of the body
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    /// Text of the top-level body paragraphs, one per line
    pub fn text(&self) -> String {
        self.body
            .paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Append a paragraph to the body
    pub fn add_paragraph(&mut self, para: Paragraph) -> &mut Paragraph {
        self.body.content.push(BlockContent::Paragraph(para));
        match self.body.content.last_mut() {
            Some(BlockContent::Paragraph(p)) => p,
            _ => unreachable!("a paragraph was just pushed"),
        }
    }

    /// Append a table to the body
    pub fn add_table(&mut self, table: Table) -> &mut Table {
        self.body.content.push(BlockContent::Table(table));
        match self.body.content.last_mut() {
            Some(BlockContent::Table(t)) => t,
            _ => unreachable!("a table was just pushed"),
        }
    }

    /// Headers in relationship id order
    pub fn headers(&self) -> impl Iterator<Item = (&str, &HeaderFooter)> {
        self.headers.iter().map(|(id, h)| (id.as_str(), h))
    }

    /// Footers in relationship id order
    pub fn footers(&self) -> impl Iterator<Item = (&str, &HeaderFooter)> {
        self.footers.iter().map(|(id, f)| (id.as_str(), f))
    }

    pub fn header(&self, r_id: &str) -> Option<&HeaderFooter> {
        self.headers.get(r_id)
    }

    pub fn header_mut(&mut self, r_id: &str) -> Option<&mut HeaderFooter> {
        self.headers.get_mut(r_id)
    }

    pub fn footer(&self, r_id: &str) -> Option<&HeaderFooter> {
        self.footers.get(r_id)
    }

    pub fn footer_mut(&mut self, r_id: &str) -> Option<&mut HeaderFooter> {
        self.footers.get_mut(r_id)
    }

    pub fn styles(&self) -> Option<&Styles> {
        self.styles.as_ref()
    }

    /// Styles, created empty when the package has none
    pub fn styles_mut(&mut self) -> &mut Styles {
        self.styles.get_or_insert_with(Styles::default)
    }

    pub fn numbering(&self) -> Option<&Numbering> {
        self.numbering.as_ref()
    }

    /// Numbering definitions, created empty when the package has none
    pub fn numbering_mut(&mut self) -> &mut Numbering {
        self.numbering.get_or_insert_with(Numbering::new)
    }

    /// Sections in document order.
    ///
    /// A paragraph carrying a `w:sectPr` ends its section; the body's
    /// trailing `w:sectPr` describes the last one.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = Vec::new();
        let mut start = 0;
        for (i, block) in self.body.content.iter().enumerate() {
            if let Some(props) = block.as_paragraph().and_then(Paragraph::section) {
                sections.push(Section {
                    properties: Some(props),
                    blocks: start..i + 1,
                });
                start = i + 1;
            }
        }
        let end = self.body.content.len();
        if self.body.section.is_some() || start < end {
            sections.push(Section {
                properties: self.body.section.as_ref(),
                blocks: start..end,
            });
        }
        sections
    }

    /// Number of media parts in the package
    pub fn image_count(&self) -> usize {
        self.package.media_count()
    }

    /// Store an image as a media part and return the relationship id to
    /// reference it with, e.g. from [`crate::drawing::Inline::picture`]
    pub fn add_image(&mut self, data: Vec<u8>, extension: &str) -> Result<String> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        let content_type = opc::image_content_type(&extension)
            .ok_or_else(|| Error::InvalidDocument(format!("unsupported image type '{}'", extension)))?;

        let content_types = self.package.content_types_mut();
        if !content_types.has_default(&extension) {
            content_types.add_default(&extension, content_type);
        }

        let media_dir = format!("{}/media", self.document_uri.directory());
        let uri = self.free_part_uri(&media_dir, "image", &extension)?;
        self.package.add_part(Part::new(uri.clone(), content_type, data));
        let r_id = self
            .package
            .register(&self.document_uri, rel_types::IMAGE, &Target::Internal(uri.clone()))?;

        log::debug!("added image {} as {}", uri, r_id);
        Ok(r_id)
    }

    /// Add an empty header and reference it from the last section
    pub fn add_header(&mut self, kind: HeaderFooterType) -> Result<String> {
        self.add_header_footer(HeaderFooterKind::Header, kind)
    }

    /// Add an empty footer and reference it from the last section
    pub fn add_footer(&mut self, kind: HeaderFooterType) -> Result<String> {
        self.add_header_footer(HeaderFooterKind::Footer, kind)
    }

    fn add_header_footer(&mut self, part_kind: HeaderFooterKind, kind: HeaderFooterType) -> Result<String> {
        let dir = self.document_uri.directory().to_string();
        let uri = self.free_part_uri(&dir, part_kind.file_stem(), "xml")?;
        let part = HeaderFooter::new(part_kind, uri.clone());

        self.package
            .add_part(Part::new(uri.clone(), part_kind.content_type(), part.to_xml()?));
        let r_id = self
            .package
            .register(&self.document_uri, part_kind.rel_type(), &Target::Internal(uri))?;

        let section = self.body.section.get_or_insert_with(SectionProperties::letter);
        let refs = match part_kind {
            HeaderFooterKind::Header => &mut section.headers,
            HeaderFooterKind::Footer => &mut section.footers,
        };
        refs.retain(|r| r.kind != kind);
        refs.push(HeaderFooterRef {
            kind,
            r_id: r_id.clone(),
        });

        match part_kind {
            HeaderFooterKind::Header => self.headers.insert(r_id.clone(), part),
            HeaderFooterKind::Footer => self.footers.insert(r_id.clone(), part),
        };
        Ok(r_id)
    }

    /// First `{dir}/{stem}{n}.{ext}` not used by a part yet
    fn free_part_uri(&self, dir: &str, stem: &str, ext: &str) -> Result<PartUri> {
        let mut n = 1;
        loop {
            let uri = PartUri::new(&format!("{}/{}{}.{}", dir, stem, n, ext))?;
            if self.package.part(&uri).is_none() {
                return Ok(uri);
            }
            n += 1;
        }
    }

    /// Resolve where a body hyperlink points.
    ///
    /// Internal anchors have no relationship and yield `None`.
    pub fn hyperlink_target(&self, link: &Hyperlink) -> Result<Option<Target>> {
        match &link.r_id {
            Some(id) => self.package.resolve(&self.document_uri, id).map(Some),
            None => Ok(None),
        }
    }

    /// Merge the spans of projections made by
    /// [`crate::projection::project_document`], updating the tree each one
    /// came from
    pub fn merge_text(&mut self, texts: &mut [Text]) {
        for text in texts {
            let blocks = match text.root() {
                Some(TextRoot::Body) => Some(&mut self.body.content),
                Some(TextRoot::Header(id)) => self.headers.get_mut(id).map(|h| &mut h.content),
                Some(TextRoot::Footer(id)) => self.footers.get_mut(id).map(|f| &mut f.content),
                None => None,
            };
            match blocks {
                Some(blocks) => text.merge(blocks),
                None => text.merge_spans(),
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sections_cover_body() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::new("one"));
        let mut ending = Paragraph::new("two");
        ending.properties.section = Some(SectionProperties {
            section_type: Some(SectionMark::Continuous),
            ..Default::default()
        });
        doc.add_paragraph(ending);
        doc.add_paragraph(Paragraph::new("three"));

        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].blocks, 0..2);
        assert_eq!(
            sections[0].properties.and_then(|p| p.section_type.clone()),
            Some(SectionMark::Continuous)
        );
        assert_eq!(sections[1].blocks, 2..3);
        assert_eq!(sections[1].properties, doc.body().section.as_ref());
    }

    #[test]
    fn test_add_header_references_last_section() {
        let mut doc = Document::new();
        let r_id = doc.add_header(HeaderFooterType::Default).unwrap();

        let section = doc.body().section.as_ref().unwrap();
        assert_eq!(section.header_ref(&HeaderFooterType::Default), Some(r_id.as_str()));
        assert_eq!(doc.header(&r_id).unwrap().uri.as_str(), "/word/header1.xml");

        let footer_id = doc.add_footer(HeaderFooterType::Default).unwrap();
        assert_ne!(footer_id, r_id);
        assert_eq!(doc.footer(&footer_id).unwrap().uri.as_str(), "/word/footer1.xml");
    }

    #[test]
    fn test_add_image() {
        let mut doc = Document::new();
        let first = doc.add_image(vec![0x89, b'P', b'N', b'G'], "png").unwrap();
        let second = doc.add_image(vec![0xFF, 0xD8], ".JPG").unwrap();
        assert_ne!(first, second);
        assert_eq!(doc.image_count(), 2);

        let target = doc.package().resolve(doc.document_uri(), &first).unwrap();
        assert_eq!(
            target,
            Target::Internal(PartUri::new("/word/media/image1.png").unwrap())
        );
        assert!(doc.add_image(vec![], "exe").is_err());
    }

    #[test]
    fn test_hyperlink_target() {
        let mut doc = Document::new();
        let r_id = doc
            .package
            .register(
                &well_known::document(),
                rel_types::HYPERLINK,
                &Target::External("https://example.com/".into()),
            )
            .unwrap();
        let link = Hyperlink {
            r_id: Some(r_id),
            ..Default::default()
        };
        assert_eq!(
            doc.hyperlink_target(&link).unwrap(),
            Some(Target::External("https://example.com/".into()))
        );
        let anchor = Hyperlink {
            anchor: Some("top".into()),
            ..Default::default()
        };
        assert_eq!(doc.hyperlink_target(&anchor).unwrap(), None);
    }
}
