//! In-memory package fixtures shared by the integration tests

#![allow(dead_code)]

use docx_agent::opc::rel_types;
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const MAIN_CT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_CT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const HEADER_CT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const FOOTER_CT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrap body content in a `w:document` root
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{body}</w:body></w:document>"#
    )
}

/// Wrap block content in a `w:hdr` or `w:ftr` root
pub fn header_footer_xml(root: &str, blocks: &str) -> String {
    format!(r#"<w:{root} xmlns:w="{W_NS}" xmlns:r="{R_NS}">{blocks}</w:{root}>"#)
}

pub const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
</w:styles>"#;

/// Builder for a minimal .docx: content types, root relationships, the
/// main document and a styles part
pub struct DocxBuilder {
    document: String,
    office_document: bool,
    rels: Vec<(String, String, String)>,
    overrides: Vec<(String, String)>,
    files: Vec<(String, Vec<u8>)>,
}

impl DocxBuilder {
    pub fn new(body: &str) -> Self {
        Self {
            document: document_xml(body),
            office_document: true,
            rels: vec![("rId1".into(), rel_types::STYLES.into(), "styles.xml".into())],
            overrides: vec![
                ("/word/document.xml".into(), MAIN_CT.into()),
                ("/word/styles.xml".into(), STYLES_CT.into()),
            ],
            files: vec![("word/styles.xml".into(), STYLES_XML.as_bytes().to_vec())],
        }
    }

    /// Add a header part at `word/{file}` under relationship `id`
    pub fn header(self, id: &str, file: &str, xml: &str) -> Self {
        self.typed_part(id, rel_types::HEADER, HEADER_CT, file, xml)
    }

    pub fn footer(self, id: &str, file: &str, xml: &str) -> Self {
        self.typed_part(id, rel_types::FOOTER, FOOTER_CT, file, xml)
    }

    fn typed_part(mut self, id: &str, rel_type: &str, ct: &str, file: &str, xml: &str) -> Self {
        self.rels.push((id.into(), rel_type.into(), file.into()));
        self.overrides.push((format!("/word/{file}"), ct.into()));
        self.files.push((format!("word/{file}"), xml.as_bytes().to_vec()));
        self
    }

    /// Add a document relationship without a part behind it
    pub fn rel(mut self, id: &str, rel_type: &str, target: &str) -> Self {
        self.rels.push((id.into(), rel_type.into(), target.into()));
        self
    }

    /// Add an arbitrary file with no content type declaration
    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        self.files.push((name.into(), data.to_vec()));
        self
    }

    pub fn without_office_document(mut self) -> Self {
        self.office_document = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        );
        for (part, ct) in &self.overrides {
            types.push_str(&format!(r#"<Override PartName="{part}" ContentType="{ct}"/>"#));
        }
        types.push_str("</Types>");
        write(&mut zip, "[Content_Types].xml", types.as_bytes(), options);

        let root_rels = if self.office_document {
            format!(
                r#"<Relationship Id="rId1" Type="{}" Target="word/document.xml"/>"#,
                rel_types::OFFICE_DOCUMENT
            )
        } else {
            String::new()
        };
        write(&mut zip, "_rels/.rels", relationships(&root_rels).as_bytes(), options);

        write(&mut zip, "word/document.xml", self.document.as_bytes(), options);
        let doc_rels: String = self
            .rels
            .iter()
            .map(|(id, ty, target)| format!(r#"<Relationship Id="{id}" Type="{ty}" Target="{target}"/>"#))
            .collect();
        write(
            &mut zip,
            "word/_rels/document.xml.rels",
            relationships(&doc_rels).as_bytes(),
            options,
        );

        for (name, data) in &self.files {
            write(&mut zip, name, data, options);
        }
        zip.finish().expect("finish zip").into_inner()
    }
}

fn relationships(items: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{items}</Relationships>"#
    )
}

fn write(zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, data: &[u8], options: SimpleFileOptions) {
    zip.start_file(name, options).expect("start zip entry");
    zip.write_all(data).expect("write zip entry");
}
