//! Integration tests: projecting loaded documents and merging spans back

mod common;

use common::{header_footer_xml, init_logger, DocxBuilder};
use docx_agent::projection::TextRoot;
use docx_agent::{find_text, project_document, Document, Text};
use pretty_assertions::assert_eq;

const BODY: &str = r#"<w:p>
      <w:r><w:rPr><w:b/></w:rPr><w:t>Quarterly</w:t></w:r>
      <w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve"> report</w:t></w:r>
      <w:r><w:t xml:space="preserve"> draft</w:t></w:r>
    </w:p>
    <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:tab/><w:t>column</w:t></w:r></w:p>
    <w:sectPr><w:headerReference w:type="default" r:id="rId3"/></w:sectPr>"#;

fn load() -> Document {
    let header = header_footer_xml(
        "hdr",
        "<w:p><w:r><w:t>Acme</w:t></w:r><w:r><w:t xml:space=\"preserve\"> Corp</w:t></w:r></w:p>",
    );
    let bytes = DocxBuilder::new(BODY)
        .header("rId3", "header1.xml", &header)
        .build();
    Document::from_bytes(&bytes).expect("load")
}

fn spans(text: &Text) -> Vec<&str> {
    text.text_body.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn test_projection_covers_body_then_headers() {
    init_logger();
    let doc = load();
    let texts = project_document(&doc);

    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0].root(), Some(&TextRoot::Body));
    assert_eq!(spans(&texts[0]), vec!["Quarterly", " report", " draft"]);
    assert_eq!(texts[0].content, "Quarterly report draft");
    assert_eq!(spans(&texts[1]), vec!["Second", "column"]);
    assert_eq!(texts[2].root(), Some(&TextRoot::Header("rId3".to_string())));
    assert_eq!(texts[2].content, "Acme Corp");

    let found = find_text(&texts, "Corp").expect("header text");
    assert_eq!(found.root(), Some(&TextRoot::Header("rId3".to_string())));
}

#[test]
fn test_merge_updates_body_and_header() {
    init_logger();
    let mut doc = load();
    let mut texts = project_document(&doc);
    doc.merge_text(&mut texts);

    // Only the two bold runs share a format
    assert_eq!(spans(&texts[0]), vec!["Quarterly report", " draft"]);
    assert_eq!(texts[0].content, "Quarterly report draft");
    // The tab keeps "column" apart
    assert_eq!(spans(&texts[1]), vec!["Second", "column"]);
    assert_eq!(spans(&texts[2]), vec!["Acme Corp"]);

    let first = doc.paragraphs().next().expect("first paragraph");
    let runs: Vec<String> = first.runs().map(|r| r.text()).collect();
    assert_eq!(runs, vec!["Quarterly report", "", " draft"]);
    assert_eq!(doc.header("rId3").expect("header").text(), "Acme Corp");

    // The merged tree survives a save and projects to the merged spans
    let saved = doc.to_bytes().expect("save");
    let reloaded = Document::from_bytes(&saved).expect("reload");
    let again = project_document(&reloaded);
    assert_eq!(spans(&again[0]), vec!["Quarterly report", " draft"]);
    assert_eq!(spans(&again[2]), vec!["Acme Corp"]);
}

#[test]
fn test_json_exchange_of_a_merged_projection() {
    init_logger();
    let mut doc = load();
    let mut texts = project_document(&doc);
    doc.merge_text(&mut texts);

    let json = texts[2].to_json().expect("to json");
    assert_eq!(
        json,
        r#"{"text_body":[{"text":"Acme Corp","space":"preserve"}],"content":"Acme Corp"}"#
    );

    let mut detached = Text::from_json(&json).expect("from json");
    assert_eq!(detached.root(), None);
    doc.merge_text(std::slice::from_mut(&mut detached));
    assert_eq!(spans(&detached), vec!["Acme Corp"]);
}
