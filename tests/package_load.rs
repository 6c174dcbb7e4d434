//! Integration tests: loading packages through the staged loader

mod common;

use common::{header_footer_xml, init_logger, DocxBuilder};
use docx_agent::opc::{rel_types, PartUri, Target};
use docx_agent::{project_document, Document, Error, LoadOptions, LoadStage};
use pretty_assertions::assert_eq;

const TEST_BODY: &str = r#"<w:p><w:r><w:t>Test</w:t></w:r></w:p><w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#;

fn span_texts(doc: &Document) -> Vec<Vec<String>> {
    project_document(doc)
        .iter()
        .map(|t| t.text_body.iter().map(|s| s.text.clone()).collect())
        .collect()
}

#[test]
fn test_minimal_package_end_to_end() {
    init_logger();
    let bytes = DocxBuilder::new(TEST_BODY).build();

    let mut doc = Document::from_bytes(&bytes).expect("load minimal package");
    assert_eq!(doc.body().content.len(), 1);
    assert!(doc.body().content[0].as_paragraph().is_some());
    assert_eq!(span_texts(&doc), vec![vec!["Test".to_string()]]);
    assert!(doc.styles().and_then(|s| s.get("Normal")).is_some());
    assert_eq!(doc.headers().count(), 0);

    let saved = doc.to_bytes().expect("save");
    let reloaded = Document::from_bytes(&saved).expect("reload");
    assert_eq!(span_texts(&reloaded), vec![vec!["Test".to_string()]]);
    assert_eq!(reloaded.body(), doc.body());
    assert_eq!(
        reloaded.styles().map(|s| &s.styles),
        doc.styles().map(|s| &s.styles)
    );
}

#[test]
fn test_header_relationship_resolves_next_to_document() {
    init_logger();
    let header = header_footer_xml("hdr", "<w:p><w:r><w:t>Running head</w:t></w:r></w:p>");
    let body = r#"<w:p><w:r><w:t>Body</w:t></w:r></w:p><w:sectPr><w:headerReference w:type="default" r:id="rId7"/></w:sectPr>"#;
    let bytes = DocxBuilder::new(body)
        .header("rId7", "header2.xml", &header)
        .build();

    let doc = Document::from_bytes(&bytes).expect("load");
    let target = doc
        .package()
        .resolve(doc.document_uri(), "rId7")
        .expect("resolve rId7");
    assert_eq!(
        target,
        Target::Internal(PartUri::new("/word/header2.xml").unwrap())
    );

    let header = doc.header("rId7").expect("decoded header");
    assert_eq!(header.text(), "Running head");
    assert_eq!(header.uri.as_str(), "/word/header2.xml");

    let missing = doc.package().resolve(doc.document_uri(), "rId99").unwrap_err();
    assert!(matches!(missing, Error::UnresolvedRelationship { ref id, .. } if id == "rId99"));

    // Body first, then headers
    assert_eq!(
        span_texts(&doc),
        vec![vec!["Body".to_string()], vec!["Running head".to_string()]]
    );
}

#[test]
fn test_missing_office_document_fails_at_root_stage() {
    init_logger();
    let bytes = DocxBuilder::new(TEST_BODY).without_office_document().build();

    let err = Document::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingRequiredPart {
            stage: LoadStage::RootLoaded,
            ..
        }
    ));
    assert_eq!(err.stage(), Some(LoadStage::RootLoaded));
}

#[test]
fn test_malformed_header_is_fatal_unless_lenient() {
    init_logger();
    let bytes = DocxBuilder::new(TEST_BODY)
        .header("rId3", "header1.xml", "<w:hdr xmlns:w=\"urn:x\"><w:p></w:hdr>")
        .build();

    let err = Document::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.stage(), Some(LoadStage::DocumentLoaded));
    match err.root_cause() {
        Error::MalformedXml { part, .. } => assert_eq!(part, "/word/header1.xml"),
        other => panic!("unexpected error: {other}"),
    }

    let opts = LoadOptions::new().lenient_parts(true);
    let doc = Document::from_bytes_with(&bytes, &opts).expect("lenient load");
    assert!(doc.header("rId3").is_none());
    assert_eq!(doc.text(), "Test");
}

#[test]
fn test_missing_header_part_is_fatal_unless_lenient() {
    init_logger();
    let bytes = DocxBuilder::new(TEST_BODY)
        .rel("rId4", rel_types::FOOTER, "footer9.xml")
        .build();

    let err = Document::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredPart { ref part, .. } if part == "/word/footer9.xml"));

    let opts = LoadOptions::new().lenient_parts(true);
    let doc = Document::from_bytes_with(&bytes, &opts).expect("lenient load");
    assert_eq!(doc.footers().count(), 0);
}

#[test]
fn test_section_reference_without_relationship() {
    init_logger();
    let body = r#"<w:p/><w:sectPr><w:footerReference w:type="default" r:id="rId42"/></w:sectPr>"#;
    let bytes = DocxBuilder::new(body).build();

    let err = Document::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.stage(), Some(LoadStage::PartsResolved));
    assert!(matches!(
        err.root_cause(),
        Error::UnresolvedRelationship { id, .. } if id == "rId42"
    ));

    let opts = LoadOptions::new().lenient_parts(true);
    assert!(Document::from_bytes_with(&bytes, &opts).is_ok());
}

#[test]
fn test_unknown_content_type_only_in_strict_mode() {
    init_logger();
    let bytes = DocxBuilder::new(TEST_BODY)
        .file("word/embeddings/blob.bin", b"\x00\x01")
        .build();

    let doc = Document::from_bytes(&bytes).expect("lenient content types");
    let blob = PartUri::new("/word/embeddings/blob.bin").unwrap();
    assert!(doc.package().part(&blob).is_some());

    let strict = LoadOptions::new().strict(true);
    let err = Document::from_bytes_with(&bytes, &strict).unwrap_err();
    assert_eq!(err.stage(), Some(LoadStage::Unopened));
    assert!(matches!(
        err.root_cause(),
        Error::UnknownContentType { part } if part == "/word/embeddings/blob.bin"
    ));
}

#[test]
fn test_strict_mode_rejects_unknown_enum() {
    init_logger();
    let body = r#"<w:p><w:pPr><w:jc w:val="sideways"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#;
    let bytes = DocxBuilder::new(body).build();

    assert!(Document::from_bytes(&bytes).is_ok());

    let strict = LoadOptions::new().strict(true);
    let err = Document::from_bytes_with(&bytes, &strict).unwrap_err();
    assert_eq!(err.stage(), Some(LoadStage::RootLoaded));
    assert!(matches!(
        err.root_cause(),
        Error::InvalidEnumValue { value, .. } if value == "sideways"
    ));
}

#[test]
fn test_unknown_relationships_and_parts_survive_save() {
    init_logger();
    let bytes = DocxBuilder::new(TEST_BODY)
        .rel(
            "rId5",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings",
            "settings.xml",
        )
        .file("word/settings.xml", b"<w:settings xmlns:w=\"urn:x\"/>")
        .build();

    let mut doc = Document::from_bytes(&bytes).expect("load");
    let saved = doc.to_bytes().expect("save");
    let reloaded = Document::from_bytes(&saved).expect("reload");

    let settings = PartUri::new("/word/settings.xml").unwrap();
    assert_eq!(
        reloaded.package().part(&settings).map(|p| p.data().to_vec()),
        Some(b"<w:settings xmlns:w=\"urn:x\"/>".to_vec())
    );
    let rels = reloaded
        .package()
        .relationships_of(reloaded.document_uri())
        .expect("document relationships");
    assert!(rels.get("rId5").is_some());
    assert_eq!(rels.all_by_type(rel_types::STYLES).count(), 1);
}
