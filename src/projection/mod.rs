//! Text projection
//!
//! Flattens paragraphs into text spans for agents that read or rewrite
//! document text. Each span remembers where its `w:t` lives, so adjacent
//! spans with identical run formatting can be merged in the projection
//! and in the tree at the same time.

use crate::document::{BlockContent, Document, Paragraph, RunContent, RunProperties, RunText, Table};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which part of a document a projection was taken from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextRoot {
    Body,
    /// Header by relationship id
    Header(String),
    /// Footer by relationship id
    Footer(String),
}

/// Location of a `w:t` inside a block sequence.
///
/// `blocks` starts with the index of the top-level block; every table on
/// the way adds a row, cell and block index triple.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanHandle {
    pub blocks: Vec<usize>,
    /// Index into the paragraph content
    pub content: usize,
    /// Index among the runs of that content entry
    pub run: usize,
    /// Index into the run content
    pub child: usize,
}

/// One text span
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    pub text: String,
    /// Raw `xml:space` value of the `w:t`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(skip)]
    pub handle: Option<SpanHandle>,
    /// Formatting of the owning run
    #[serde(skip)]
    pub format: Option<RunProperties>,
    /// A tab, carriage return or break precedes this span
    #[serde(skip)]
    pub separated: bool,
}

/// Projection of one paragraph, or of a table through `next`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub text_body: Vec<TextBody>,
    /// Concatenated span text
    #[serde(default)]
    pub content: String,
    /// Cell paragraphs of a table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next: Vec<Text>,
    #[serde(skip)]
    root: Option<TextRoot>,
}

impl Text {
    /// Part the projection was taken from, when made by [`project_document`]
    pub fn root(&self) -> Option<&TextRoot> {
        self.root.as_ref()
    }

    /// Merge adjacent spans with identical formatting, here and in
    /// `blocks`, which must be the sequence the projection was made from.
    ///
    /// The absorbed `w:t` is left in place with empty text so the handles
    /// of other spans stay valid.
    pub fn merge(&mut self, blocks: &mut [BlockContent]) {
        self.merge_with(Some(blocks));
    }

    /// Merge the projection alone, for projections without a tree such as
    /// those read back with [`Text::from_json`]
    pub fn merge_spans(&mut self) {
        self.merge_with(None);
    }

    fn merge_with(&mut self, mut blocks: Option<&mut [BlockContent]>) {
        let mut i = 1;
        while i < self.text_body.len() {
            let (head, tail) = self.text_body.split_at_mut(i);
            let prev = &mut head[i - 1];
            let curr = &tail[0];
            if !mergeable(prev, curr) {
                i += 1;
                continue;
            }

            prev.text.push_str(&curr.text);
            prev.space = curr.space.clone();
            if let Some(blocks) = blocks.as_deref_mut() {
                if let Some(handle) = &prev.handle {
                    if let Some(node) = text_at_mut(blocks, handle) {
                        node.text = prev.text.clone();
                        node.space = prev.space.clone();
                    }
                }
                if let Some(handle) = &curr.handle {
                    if let Some(node) = text_at_mut(blocks, handle) {
                        node.text.clear();
                    }
                }
            }
            self.text_body.remove(i);
        }

        for next in &mut self.next {
            next.merge_with(blocks.as_deref_mut());
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a projection back from JSON; handles and formatting are not
    /// part of the format
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn mergeable(prev: &TextBody, curr: &TextBody) -> bool {
    if curr.separated {
        return false;
    }
    match (&prev.format, &curr.format) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Project one paragraph found at `path`; `None` when it has no text.
///
/// Only empty `w:t` are left out. A whitespace-only `w:t` such as the
/// single space between two words is a span of its own, so it can merge
/// with its neighbours.
fn project_paragraph(para: &Paragraph, path: &[usize]) -> Option<Text> {
    let mut spans = Vec::new();
    let mut separated = false;

    for (content, entry) in para.content.iter().enumerate() {
        for (run_idx, run) in entry.runs().iter().enumerate() {
            for (child, item) in run.content.iter().enumerate() {
                match item {
                    RunContent::Text(t) if !t.text.is_empty() => {
                        spans.push(TextBody {
                            text: t.text.clone(),
                            space: t.space.clone(),
                            handle: Some(SpanHandle {
                                blocks: path.to_vec(),
                                content,
                                run: run_idx,
                                child,
                            }),
                            format: Some(run.properties.clone()),
                            separated,
                        });
                        separated = false;
                    }
                    item if item.is_separator() => separated = true,
                    _ => {}
                }
            }
        }
    }

    if spans.is_empty() {
        return None;
    }
    let content = spans.iter().map(|s| s.text.as_str()).collect();
    Some(Text {
        text_body: spans,
        content,
        ..Default::default()
    })
}

fn project_table(table: &Table, path: &mut Vec<usize>) -> Text {
    let mut next = Vec::new();
    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.cells.iter().enumerate() {
            for (b, block) in cell.content.iter().enumerate() {
                path.extend([r, c, b]);
                match block {
                    BlockContent::Paragraph(p) => next.extend(project_paragraph(p, path)),
                    BlockContent::Table(t) => {
                        let nested = project_table(t, path);
                        if !nested.next.is_empty() {
                            next.push(nested);
                        }
                    }
                    BlockContent::Unknown(_) => {}
                }
                path.truncate(path.len() - 3);
            }
        }
    }
    Text {
        next,
        ..Default::default()
    }
}

/// Project a block sequence: a body, header, footer or table cell.
///
/// Paragraphs without text are left out; every top-level table yields one
/// entry whose `next` holds its cell paragraphs.
pub fn project_blocks(blocks: &[BlockContent]) -> Vec<Text> {
    let mut texts = Vec::new();
    let mut path = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        path.push(i);
        match block {
            BlockContent::Paragraph(p) => texts.extend(project_paragraph(p, &path)),
            BlockContent::Table(t) => texts.push(project_table(t, &mut path)),
            BlockContent::Unknown(_) => {}
        }
        path.pop();
    }
    texts
}

/// Project the body, then every header and footer
pub fn project_document(doc: &Document) -> Vec<Text> {
    let mut texts = with_root(project_blocks(&doc.body().content), TextRoot::Body);
    for (id, header) in doc.headers() {
        texts.extend(with_root(
            project_blocks(&header.content),
            TextRoot::Header(id.to_string()),
        ));
    }
    for (id, footer) in doc.footers() {
        texts.extend(with_root(
            project_blocks(&footer.content),
            TextRoot::Footer(id.to_string()),
        ));
    }
    texts
}

fn with_root(mut texts: Vec<Text>, root: TextRoot) -> Vec<Text> {
    for text in &mut texts {
        text.root = Some(root.clone());
    }
    texts
}

/// First projection whose content contains `needle`, searching table
/// cells depth first
pub fn find_text<'a>(texts: &'a [Text], needle: &str) -> Option<&'a Text> {
    for text in texts {
        if text.content.contains(needle) {
            return Some(text);
        }
        if let Some(found) = find_text(&text.next, needle) {
            return Some(found);
        }
    }
    None
}

fn text_at_mut<'a>(blocks: &'a mut [BlockContent], handle: &SpanHandle) -> Option<&'a mut RunText> {
    let para = paragraph_at_mut(blocks, &handle.blocks)?;
    let run = para
        .content
        .get_mut(handle.content)?
        .runs_mut()
        .get_mut(handle.run)?;
    match run.content.get_mut(handle.child)? {
        RunContent::Text(t) => Some(t),
        _ => None,
    }
}

fn paragraph_at_mut<'a>(blocks: &'a mut [BlockContent], path: &[usize]) -> Option<&'a mut Paragraph> {
    let (first, rest) = path.split_first()?;
    match blocks.get_mut(*first)? {
        BlockContent::Paragraph(p) if rest.is_empty() => Some(p),
        BlockContent::Table(t) => {
            let [row, cell, tail @ ..] = rest else {
                return None;
            };
            let cell = t.rows.get_mut(*row)?.cells.get_mut(*cell)?;
            paragraph_at_mut(&mut cell.content, tail)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ParagraphContent, Run, TableCell};
    use pretty_assertions::assert_eq;

    fn paragraph(runs: Vec<Run>) -> Paragraph {
        Paragraph {
            content: runs.into_iter().map(ParagraphContent::Run).collect(),
            ..Default::default()
        }
    }

    fn spans(text: &Text) -> Vec<&str> {
        text.text_body.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_merge_identical_runs() {
        let mut blocks = vec![BlockContent::Paragraph(paragraph(vec![
            Run::new("Hello"),
            Run::new(" "),
            Run::new("World"),
        ]))];
        let mut texts = project_blocks(&blocks);
        assert_eq!(texts.len(), 1);
        assert_eq!(spans(&texts[0]), vec!["Hello", " ", "World"]);

        texts[0].merge(&mut blocks);
        assert_eq!(spans(&texts[0]), vec!["Hello World"]);
        assert_eq!(texts[0].content, "Hello World");

        // Tree holds the merged text in the first run and blanks the rest
        let para = blocks[0].as_paragraph().unwrap();
        let runs: Vec<String> = para.runs().map(Run::text).collect();
        assert_eq!(runs, vec!["Hello World", "", ""]);
        assert_eq!(para.text(), "Hello World");

        // Projection of the merged tree agrees
        let again = project_blocks(&blocks);
        assert_eq!(spans(&again[0]), vec!["Hello World"]);
    }

    #[test]
    fn test_different_formatting_never_merges() {
        let mut bold = Run::new("bold");
        bold.set_bold(true);
        let mut blocks = vec![BlockContent::Paragraph(paragraph(vec![bold, Run::new("plain")]))];

        let mut texts = project_blocks(&blocks);
        texts[0].merge(&mut blocks);
        assert_eq!(spans(&texts[0]), vec!["bold", "plain"]);
    }

    #[test]
    fn test_separator_blocks_merge() {
        let mut run = Run::new("before");
        run.content.push(RunContent::Tab);
        run.content.push(RunContent::Text(RunText::new("after")));
        let mut blocks = vec![BlockContent::Paragraph(paragraph(vec![run]))];

        let mut texts = project_blocks(&blocks);
        assert!(texts[0].text_body[1].separated);
        texts[0].merge(&mut blocks);
        assert_eq!(spans(&texts[0]), vec!["before", "after"]);
        assert_eq!(texts[0].content, "beforeafter");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut blocks = vec![BlockContent::Paragraph(paragraph(vec![
            Run::new("a"),
            Run::new("b"),
        ]))];
        let mut texts = project_blocks(&blocks);
        texts[0].merge(&mut blocks);
        let once = texts.clone();
        texts[0].merge(&mut blocks);
        assert_eq!(texts, once);
    }

    #[test]
    fn test_merge_takes_last_space() {
        let mut blocks = vec![BlockContent::Paragraph(paragraph(vec![
            Run::new("trailing "),
            Run::new("x"),
        ]))];
        let mut texts = project_blocks(&blocks);
        assert_eq!(texts[0].text_body[0].space.as_deref(), Some("preserve"));
        texts[0].merge(&mut blocks);
        assert_eq!(texts[0].text_body[0].space, None);
        assert_eq!(texts[0].text_body[0].text, "trailing x");
    }

    #[test]
    fn test_empty_paragraphs_are_skipped() {
        let blocks = vec![
            BlockContent::Paragraph(Paragraph::default()),
            BlockContent::Paragraph(Paragraph::new("text")),
        ];
        let texts = project_blocks(&blocks);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text_body[0].handle.as_ref().unwrap().blocks, vec![1]);
    }

    #[test]
    fn test_table_cells_nest_in_next() {
        let outer: &[&str] = &["a", "b"];
        let nested: &[&str] = &["x"];
        let mut table = Table::from_data(&[outer]);
        let mut inner = TableCell::new("deep");
        inner.add_table(Table::from_data(&[nested]));
        table.rows[0].cells[1] = inner;
        let mut blocks = vec![BlockContent::Table(table)];

        let texts = project_blocks(&blocks);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].content, "");
        let contents: Vec<&str> = texts[0].next.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "deep", ""]);
        assert_eq!(texts[0].next[2].next[0].content, "x");
        assert_eq!(
            texts[0].next[2].next[0].text_body[0].handle.as_ref().unwrap().blocks,
            vec![0, 0, 1, 1, 0, 0, 0]
        );

        let found = find_text(&texts, "x").unwrap();
        assert_eq!(found.content, "x");
        assert!(find_text(&texts, "missing").is_none());

        // Handles reach into nested tables
        let handle = texts[0].next[2].next[0].text_body[0].handle.clone().unwrap();
        text_at_mut(&mut blocks, &handle).unwrap().text = "y".into();
        assert_eq!(project_blocks(&blocks)[0].next[2].next[0].content, "y");
    }

    #[test]
    fn test_json_shape() {
        let blocks = vec![BlockContent::Paragraph(paragraph(vec![
            Run::new("Hi"),
            Run::new(" there"),
        ]))];
        let texts = project_blocks(&blocks);
        let json = texts[0].to_json().unwrap();
        assert_eq!(
            json,
            r#"{"text_body":[{"text":"Hi"},{"text":" there","space":"preserve"}],"content":"Hi there"}"#
        );

        let back = Text::from_json(&json).unwrap();
        assert_eq!(back.content, "Hi there");
        assert_eq!(back.text_body[1].space.as_deref(), Some("preserve"));
        assert!(back.text_body[1].handle.is_none());
        assert_eq!(back.to_json().unwrap(), json);
    }

    #[test]
    fn test_detached_projection_does_not_merge() {
        let json = r#"{"text_body":[{"text":"a"},{"text":"b"}],"content":"ab"}"#;
        let mut text = Text::from_json(json).unwrap();
        text.merge_spans();
        assert_eq!(spans(&text), vec!["a", "b"]);
    }
}
