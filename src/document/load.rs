//! Package load state machine
//!
//! `Unopened -> RootLoaded -> DocumentLoaded -> PartsResolved -> Ready`.
//! A failure aborts the load and is tagged with the last stage reached.

use super::{Document, HeaderFooter, HeaderFooterKind, Numbering, Styles};
use crate::document::Body;
use crate::error::{Error, Result};
use crate::opc::{rel_types, Package, PartUri, Relationship};
use crate::options::LoadOptions;
use crate::xml::{Ns, PartReader, RawXmlElement};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Seek};

/// Progress of a package load
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoadStage {
    /// Nothing read yet: the container, content types and root relationships
    Unopened,
    /// Root relationships read; looking for the main document
    RootLoaded,
    /// Main document decoded; resolving the parts it references
    DocumentLoaded,
    /// Styles, numbering, headers and footers decoded
    PartsResolved,
    /// Cross-references checked
    Ready,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadStage::Unopened => "unopened",
            LoadStage::RootLoaded => "root loaded",
            LoadStage::DocumentLoaded => "document loaded",
            LoadStage::PartsResolved => "parts resolved",
            LoadStage::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Decoded `w:document` root
pub(crate) struct DocumentXml {
    pub root_attributes: Vec<(String, String)>,
    pub body: Body,
    /// Children other than `w:body`, such as `w:background`
    pub extra_children: Vec<RawXmlElement>,
}

pub(crate) fn decode_document_xml(part: &PartUri, data: &[u8], strict: bool) -> Result<DocumentXml> {
    let mut r = PartReader::from_bytes(part.as_str(), data, strict);
    r.read_root((Ns::W, b"document"), |r, el| {
        let root_attributes = el.raw_attributes();
        let mut body = None;
        let mut extra_children = Vec::new();
        r.children(el, |r, child| {
            match (child.ns, child.local()) {
                (Ns::W, b"body") => body = Some(Body::decode(r, child)?),
                _ => extra_children.push(RawXmlElement::read(r, child)?),
            }
            Ok(true)
        })?;
        let body = body.ok_or_else(|| r.malformed(Some("w:document".into()), "missing w:body"))?;
        Ok(DocumentXml {
            root_attributes,
            body,
            extra_children,
        })
    })
}

struct Loader<'a> {
    stage: LoadStage,
    options: &'a LoadOptions,
}

impl<'a> Loader<'a> {
    fn advance(&mut self, stage: LoadStage) {
        log::debug!("load stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn run<R: Read + Seek>(&mut self, reader: R) -> Result<Document> {
        let package = Package::from_reader(reader, self.options)?;
        self.advance(LoadStage::RootLoaded);

        let document_uri = package
            .main_document_uri()
            .ok_or_else(|| Error::MissingRequiredPart {
                stage: self.stage,
                part: "officeDocument relationship in /_rels/.rels".into(),
            })?;
        let part = package
            .part(&document_uri)
            .ok_or_else(|| Error::MissingRequiredPart {
                stage: self.stage,
                part: document_uri.to_string(),
            })?;
        let decoded = decode_document_xml(&document_uri, part.data(), self.options.strict)?;
        self.advance(LoadStage::DocumentLoaded);

        let mut doc = Document {
            package,
            document_uri,
            root_attributes: decoded.root_attributes,
            extra_children: decoded.extra_children,
            body: decoded.body,
            headers: BTreeMap::new(),
            footers: BTreeMap::new(),
            styles: None,
            numbering: None,
        };
        self.resolve_parts(&mut doc)?;
        self.advance(LoadStage::PartsResolved);

        self.check_section_references(&doc)?;
        self.advance(LoadStage::Ready);
        Ok(doc)
    }

    fn resolve_parts(&self, doc: &mut Document) -> Result<()> {
        let rels: Vec<Relationship> = doc
            .package
            .relationships_of(&doc.document_uri)
            .map(|rels| rels.iter().cloned().collect())
            .unwrap_or_default();

        for rel in rels {
            if rel.is_external() {
                log::debug!("skipping external relationship {} ({})", rel.id, rel.rel_type);
                continue;
            }
            let kind = match rel.rel_type.as_str() {
                rel_types::STYLES | rel_types::NUMBERING => None,
                rel_types::HEADER => Some(HeaderFooterKind::Header),
                rel_types::FOOTER => Some(HeaderFooterKind::Footer),
                other => {
                    log::debug!("not decoding relationship {} of type {}", rel.id, other);
                    continue;
                }
            };
            let uri = doc.document_uri.resolve(&rel.target)?;

            match kind {
                None => self.load_shared_part(doc, &rel, uri)?,
                Some(kind) => {
                    if let Some(part) = self.load_header_footer(doc, kind, uri)? {
                        match kind {
                            HeaderFooterKind::Header => doc.headers.insert(rel.id.clone(), part),
                            HeaderFooterKind::Footer => doc.footers.insert(rel.id.clone(), part),
                        };
                    }
                }
            }
        }

        log::debug!(
            "resolved {} headers, {} footers, styles: {}, numbering: {}",
            doc.headers.len(),
            doc.footers.len(),
            doc.styles.is_some(),
            doc.numbering.is_some()
        );
        Ok(())
    }

    /// Styles and numbering; failures here are fatal
    fn load_shared_part(&self, doc: &mut Document, rel: &Relationship, uri: PartUri) -> Result<()> {
        let part = doc
            .package
            .part(&uri)
            .ok_or_else(|| Error::MissingRequiredPart {
                stage: self.stage,
                part: uri.to_string(),
            })?;
        if rel.rel_type == rel_types::STYLES {
            doc.styles = Some(Styles::from_xml(uri.as_str(), part.data(), self.options.strict)?);
        } else {
            doc.numbering = Some(Numbering::from_xml(uri.as_str(), part.data(), self.options.strict)?);
        }
        Ok(())
    }

    fn load_header_footer(
        &self,
        doc: &Document,
        kind: HeaderFooterKind,
        uri: PartUri,
    ) -> Result<Option<HeaderFooter>> {
        let decoded = match doc.package.part(&uri) {
            Some(part) => HeaderFooter::from_xml(kind, uri.clone(), part.data(), self.options.strict),
            None => Err(Error::MissingRequiredPart {
                stage: self.stage,
                part: uri.to_string(),
            }),
        };
        match decoded {
            Ok(part) => Ok(Some(part)),
            Err(err) if self.options.lenient_parts => {
                log::warn!("omitting {}: {}", uri, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Every header/footer reference of every section must resolve
    fn check_section_references(&self, doc: &Document) -> Result<()> {
        let rels = doc.package.relationships_of(&doc.document_uri);
        for section in doc.sections() {
            let Some(props) = section.properties else {
                continue;
            };
            for reference in props.headers.iter().chain(&props.footers) {
                if rels.and_then(|r| r.get(&reference.r_id)).is_some() {
                    continue;
                }
                if self.options.lenient_parts {
                    log::warn!("section references missing relationship {}", reference.r_id);
                    continue;
                }
                return Err(Error::UnresolvedRelationship {
                    part: doc.document_uri.to_string(),
                    id: reference.r_id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Run the load state machine over a package stream
pub(crate) fn load<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<Document> {
    let mut loader = Loader {
        stage: LoadStage::Unopened,
        options,
    };
    loader.run(reader).map_err(|err| err.at_stage(loader.stage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stage_order_and_display() {
        assert!(LoadStage::Unopened < LoadStage::RootLoaded);
        assert!(LoadStage::PartsResolved < LoadStage::Ready);
        assert_eq!(LoadStage::DocumentLoaded.to_string(), "document loaded");
    }

    #[test]
    fn test_document_without_body_is_malformed() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        let uri = PartUri::new("/word/document.xml").unwrap();
        let err = decode_document_xml(&uri, xml.as_bytes(), false).err().unwrap();
        assert!(matches!(err, Error::MalformedXml { ref part, .. } if part == "/word/document.xml"));
    }

    #[test]
    fn test_document_keeps_background() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:background w:color="FFFFFF"/><w:body><w:p/></w:body></w:document>"#;
        let uri = PartUri::new("/word/document.xml").unwrap();
        let decoded = decode_document_xml(&uri, xml.as_bytes(), true).unwrap();
        assert_eq!(decoded.body.content.len(), 1);
        assert_eq!(decoded.extra_children.len(), 1);
        assert_eq!(decoded.extra_children[0].local_name(), "background");
    }
}
