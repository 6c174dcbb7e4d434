//! Writing the document model back into its package

use super::Document;
use crate::error::Result;
use crate::opc::{self, rel_types, well_known, Part, PartUri, Target};
use crate::xml::{self, writer};
use quick_xml::events::BytesStart;
use quick_xml::Writer;

impl Document {
    /// Re-encode every typed part into the package.
    ///
    /// Relationships are created for typed parts that have none yet; parts
    /// the model does not own (media, theme, settings) are left untouched.
    pub(crate) fn update_package(&mut self) -> Result<()> {
        let document_xml = self.encode_document()?;
        self.package.add_part(Part::new(
            self.document_uri.clone(),
            opc::MAIN_DOCUMENT,
            document_xml,
        ));
        if self.package.main_document_uri().is_none() {
            let target = Target::Internal(self.document_uri.clone());
            self.package
                .register(&PartUri::root(), rel_types::OFFICE_DOCUMENT, &target)?;
        }

        if let Some(styles) = &self.styles {
            let data = styles.to_xml()?;
            self.store_shared_part(rel_types::STYLES, opc::STYLES, well_known::styles(), data)?;
        }
        if let Some(numbering) = &self.numbering {
            let data = numbering.to_xml()?;
            self.store_shared_part(rel_types::NUMBERING, opc::NUMBERING, well_known::numbering(), data)?;
        }

        for part in self.headers.values().chain(self.footers.values()) {
            let data = part.to_xml()?;
            self.package
                .add_part(Part::new(part.uri.clone(), part.kind.content_type(), data));
        }

        log::debug!(
            "package updated: {} headers, {} footers",
            self.headers.len(),
            self.footers.len()
        );
        Ok(())
    }

    /// Store styles or numbering at the part its relationship points to,
    /// registering `default_uri` when there is no relationship yet
    fn store_shared_part(
        &mut self,
        rel_type: &str,
        content_type: &str,
        default_uri: PartUri,
        data: Vec<u8>,
    ) -> Result<()> {
        let existing = self
            .package
            .relationships_of(&self.document_uri)
            .and_then(|rels| rels.by_type(rel_type))
            .map(|rel| rel.target.clone());

        let uri = match existing {
            Some(target) => self.document_uri.resolve(&target)?,
            None => {
                let target = Target::Internal(default_uri.clone());
                self.package.register(&self.document_uri, rel_type, &target)?;
                default_uri
            }
        };
        self.package.add_part(Part::new(uri, content_type, data));
        Ok(())
    }

    fn encode_document(&self) -> Result<Vec<u8>> {
        let mut w = Writer::new(Vec::new());
        let mut attrs = self.root_attributes.clone();
        xml::complete_root_attributes(&mut attrs);

        writer::write_decl(&mut w)?;
        let mut start = BytesStart::new("w:document");
        for (key, value) in &attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer::start(&mut w, start)?;
        for child in &self.extra_children {
            child.write_to(&mut w)?;
        }
        self.body.write_to(&mut w)?;
        writer::end(&mut w, "w:document")?;
        Ok(w.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Paragraph;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_registers_parts() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::new("Hello"));
        doc.update_package().unwrap();

        let package = &doc.package;
        assert_eq!(package.main_document_uri(), Some(well_known::document()));
        let rels = package.relationships_of(&well_known::document()).unwrap();
        assert!(rels.by_type(rel_types::STYLES).is_some());
        assert_eq!(
            package.content_types().get(&well_known::styles()),
            Some(opc::STYLES)
        );

        let data = package.part(&well_known::document()).unwrap().data();
        let xml = std::str::from_utf8(data).unwrap();
        assert!(xml.contains("<w:t>Hello</w:t>"));
        assert!(xml.contains("xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\""));
    }

    #[test]
    fn test_update_is_stable() {
        let mut doc = Document::new();
        doc.update_package().unwrap();
        doc.update_package().unwrap();

        let rels = doc.package.relationships_of(&well_known::document()).unwrap();
        assert_eq!(rels.all_by_type(rel_types::STYLES).count(), 1);
        assert_eq!(doc.package.relationships().len(), 1);
    }
}
