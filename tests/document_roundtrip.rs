//! Integration tests: saving and reloading documents

mod common;

use common::{init_logger, DocxBuilder};
use docx_agent::document::{BlockContent, ParagraphContent, RunContent, SectionMark, TableCell};
use docx_agent::drawing::{
    Anchor, Drawing, Graphic, McContent, NonVisualProps, Picture, PositiveSize2D, VmlShape, Wrap,
    WrapSquare, WrapText,
};
use docx_agent::{Document, Paragraph, PartUri, Run, Table};
use pretty_assertions::assert_eq;

fn reload(doc: &mut Document) -> Document {
    let bytes = doc.to_bytes().expect("save");
    Document::from_bytes(&bytes).expect("reload")
}

fn document_part_xml(doc: &Document) -> String {
    let uri = PartUri::new("/word/document.xml").unwrap();
    let part = doc.package().part(&uri).expect("document part");
    String::from_utf8(part.data().to_vec()).expect("utf-8 document part")
}

#[test]
fn test_nested_table_survives_round_trip() {
    init_logger();
    let mut doc = Document::new();

    let row: &[&str] = &["inner"];
    let inner = Table::from_data(&[row]);
    let mut cell = TableCell::new("");
    cell.content = vec![BlockContent::Table(inner)];

    let mut outer = Table::new(1, 1);
    outer.rows[0].cells[0] = cell;
    doc.add_table(outer);

    let reloaded = reload(&mut doc);
    let table = reloaded.tables().next().expect("outer table");
    let content = &table.rows[0].cells[0].content;
    assert_eq!(content.len(), 1);
    let nested = content[0].as_table().expect("nested table");
    assert_eq!(nested.rows[0].cells[0].text(), "inner");
    assert_eq!(reloaded.body(), doc.body());
}

#[test]
fn test_sections_from_paragraph_and_body() {
    init_logger();
    let body = r#"<w:p><w:r><w:t>one</w:t></w:r></w:p>
        <w:p><w:pPr><w:sectPr><w:type w:val="continuous"/></w:sectPr></w:pPr><w:r><w:t>two</w:t></w:r></w:p>
        <w:p><w:r><w:t>three</w:t></w:r></w:p>
        <w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#;
    let mut doc = Document::from_bytes(&DocxBuilder::new(body).build()).expect("load");

    let check = |doc: &Document| {
        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].blocks, 0..2);
        assert_eq!(
            sections[0].properties.and_then(|p| p.section_type.as_ref()),
            Some(&SectionMark::Continuous)
        );
        assert_eq!(sections[1].blocks, 2..3);
        let size = sections[1]
            .properties
            .and_then(|p| p.page_size.as_ref())
            .expect("page size");
        assert_eq!((size.w, size.h), (Some(11906), Some(16838)));
    };

    check(&doc);
    let reloaded = reload(&mut doc);
    check(&reloaded);
    assert_eq!(reloaded.body(), doc.body());
}

#[test]
fn test_anchor_writes_a_single_wrap() {
    init_logger();
    let mut doc = Document::new();
    let r_id = doc.add_image(vec![0x89, b'P', b'N', b'G'], "png").expect("image");

    let mut anchor = Anchor::new(
        Graphic::picture(Picture::embedded(r_id, 914_400, 457_200, 1, "float.png")),
        PositiveSize2D::new(914_400, 457_200),
        NonVisualProps::new(1, "float.png"),
    );
    anchor.wrap = Some(Wrap::Square(WrapSquare::new(WrapText::BothSides)));

    let mut para = Paragraph::default();
    para.add_run(Run::with_drawing(anchor));
    doc.add_paragraph(para);

    let reloaded = reload(&mut doc);
    let xml = document_part_xml(&reloaded);
    assert_eq!(xml.matches("<wp:wrap").count(), 1);
    assert!(xml.contains("<wp:wrapSquare"));

    let drawing = reloaded
        .paragraphs()
        .flat_map(|p| p.runs())
        .flat_map(|r| r.drawings())
        .next()
        .expect("drawing");
    match drawing {
        Drawing::Anchor(anchor) => {
            assert!(matches!(anchor.wrap, Some(Wrap::Square(ref sq)) if sq.wrap_text == WrapText::BothSides));
            assert_eq!(anchor.doc_pr.name, "float.png");
        }
        other => panic!("expected an anchor, got {other:?}"),
    }
    assert_eq!(reloaded.image_count(), 1);
}

#[test]
fn test_alternate_content_round_trip() {
    init_logger();
    let body = r#"<w:p><w:r><mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">
        <mc:Choice Requires="wps">
          <w:drawing><wp:inline xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">
            <wp:extent cx="100" cy="200"/><wp:docPr id="4" name="Text Box 4"/>
          </wp:inline></w:drawing>
        </mc:Choice>
        <mc:Fallback>
          <w:pict><v:rect xmlns:v="urn:schemas-microsoft-com:vml" id="Text Box 4" style="width:10pt;height:20pt"/></w:pict>
        </mc:Fallback>
      </mc:AlternateContent></w:r></w:p>"#;
    let mut doc = Document::from_bytes(&DocxBuilder::new(body).build()).expect("load");

    let check = |doc: &Document| {
        let para = doc.paragraphs().next().expect("paragraph");
        let run = match &para.content[0] {
            ParagraphContent::Run(run) => run,
            other => panic!("expected a run, got {other:?}"),
        };
        let alt = match &run.content[0] {
            RunContent::AlternateContent(alt) => alt,
            other => panic!("expected alternate content, got {other:?}"),
        };
        let choice = alt.choice.as_ref().expect("choice");
        assert_eq!(choice.requires, "wps");
        match &choice.content {
            Some(McContent::Drawing(Drawing::Inline(inline))) => {
                assert_eq!(inline.extent, PositiveSize2D::new(100, 200));
                assert_eq!(inline.doc_pr.name, "Text Box 4");
            }
            other => panic!("unexpected choice content {other:?}"),
        }
        match &alt.fallback {
            Some(McContent::Pict(pict)) => match &pict.shapes[0] {
                VmlShape::Rect(rect) => {
                    assert_eq!(rect.id.as_deref(), Some("Text Box 4"));
                    assert_eq!(rect.style.as_deref(), Some("width:10pt;height:20pt"));
                }
                other => panic!("unexpected fallback shape {other:?}"),
            },
            other => panic!("unexpected fallback {other:?}"),
        }
    };

    check(&doc);
    let reloaded = reload(&mut doc);
    check(&reloaded);
    assert_eq!(reloaded.body(), doc.body());
}
