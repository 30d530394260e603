//! Positioned Markdown syntax tree
//!
//! The tree mirrors the mdast shape rules expect (`root`, `heading`,
//! `listItem`, ...). [`parse`] builds it from pulldown-cmark's offset
//! iterator; trees can also be assembled by hand, including nodes with
//! synthetic positions that were never part of the source.

use crate::position::{LineIndex, Span};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

/// Node type together with its type-specific fields
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading { depth: u8 },
    ThematicBreak,
    Blockquote,
    List { ordered: bool, start: Option<u64> },
    ListItem { checked: Option<bool> },
    /// `fenced` is false for indented code
    Code {
        fenced: bool,
        lang: Option<String>,
        value: String,
    },
    Html { value: String },
    Text { value: String },
    Emphasis,
    Strong,
    Delete,
    InlineCode { value: String },
    Break,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String>, alt: String },
    Table,
    TableRow,
    TableCell,
    FootnoteDefinition { label: String },
    FootnoteReference { label: String },
}

impl NodeKind {
    /// mdast type name
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading { .. } => "heading",
            NodeKind::ThematicBreak => "thematicBreak",
            NodeKind::Blockquote => "blockquote",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem { .. } => "listItem",
            NodeKind::Code { .. } => "code",
            NodeKind::Html { .. } => "html",
            NodeKind::Text { .. } => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Delete => "delete",
            NodeKind::InlineCode { .. } => "inlineCode",
            NodeKind::Break => "break",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::FootnoteDefinition { .. } => "footnoteDefinition",
            NodeKind::FootnoteReference { .. } => "footnoteReference",
        }
    }

    /// Whether nodes of this kind carry a `children` list (even if empty)
    pub fn is_parent(&self) -> bool {
        !matches!(
            self,
            NodeKind::ThematicBreak
                | NodeKind::Code { .. }
                | NodeKind::Html { .. }
                | NodeKind::Text { .. }
                | NodeKind::InlineCode { .. }
                | NodeKind::Break
                | NodeKind::Image { .. }
                | NodeKind::FootnoteReference { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Span,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, position: Span) -> Self {
        Self {
            kind,
            position,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, position: Span, children: Vec<Node>) -> Self {
        Self {
            kind,
            position,
            children,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_parent(&self) -> bool {
        self.kind.is_parent()
    }

    /// Literal value of text-like nodes
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { value }
            | NodeKind::Html { value }
            | NodeKind::InlineCode { value }
            | NodeKind::Code { value, .. } => Some(value),
            _ => None,
        }
    }

    fn alt(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Image { alt, .. } => Some(alt),
            _ => None,
        }
    }

    fn title(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Link { title, .. } | NodeKind::Image { title, .. } => title.as_deref(),
            _ => None,
        }
    }
}

/// Returned by visitors to steer the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    /// Do not descend into the current node's children
    SkipChildren,
}

/// Depth-first pre-order traversal.
///
/// The visitor receives `(node, index_in_parent, parent)` for every node whose
/// type name equals `test` (or every node when `test` is `None`). Non-matching
/// nodes are still descended into. With `reverse` children are walked last to
/// first.
pub fn visit<'a, F>(tree: &'a Node, test: Option<&str>, mut visitor: F, reverse: bool)
where
    F: FnMut(&'a Node, usize, Option<&'a Node>) -> VisitControl,
{
    walk(tree, 0, None, test, &mut visitor, reverse);
}

fn walk<'a, F>(node: &'a Node, index: usize, parent: Option<&'a Node>, test: Option<&str>, visitor: &mut F, reverse: bool)
where
    F: FnMut(&'a Node, usize, Option<&'a Node>) -> VisitControl,
{
    if test.is_none_or(|t| t == node.type_name()) && visitor(node, index, parent) == VisitControl::SkipChildren {
        return;
    }

    if reverse {
        for (idx, child) in node.children.iter().enumerate().rev() {
            walk(child, idx, Some(node), test, visitor, reverse);
        }
    } else {
        for (idx, child) in node.children.iter().enumerate() {
            walk(child, idx, Some(node), test, visitor, reverse);
        }
    }
}

/// Plain-text content of a node: its `value`, `alt` or `title`, falling back
/// to the concatenation of its children.
pub fn to_string(node: &Node) -> String {
    if let Some(text) = [node.value(), node.alt(), node.title()]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    {
        return text.to_string();
    }
    node.children.iter().map(to_string).collect()
}

/// Node under construction while its end event has not been seen yet
struct Frame {
    kind: NodeKind,
    start: usize,
    end: usize,
    children: Vec<Node>,
    /// Literal content collected for code and HTML blocks
    literal: String,
}

/// Parse Markdown into a positioned tree
pub fn parse(content: &str) -> Node {
    let index = LineIndex::new(content);
    parse_with_index(content, &index)
}

pub(crate) fn parse_with_index(content: &str, index: &LineIndex) -> Node {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut stack = vec![Frame {
        kind: NodeKind::Root,
        start: 0,
        end: content.len(),
        children: Vec::new(),
        literal: String::new(),
    }];

    for (event, range) in Parser::new_ext(content, options).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                let kind = match tag {
                    Tag::Paragraph => NodeKind::Paragraph,
                    Tag::Heading { level, .. } => NodeKind::Heading { depth: level as u8 },
                    Tag::BlockQuote(_) => NodeKind::Blockquote,
                    Tag::CodeBlock(kind) => {
                        let (fenced, lang) = match kind {
                            CodeBlockKind::Fenced(info) => (true, info.split_whitespace().next().map(str::to_string)),
                            CodeBlockKind::Indented => (false, None),
                        };
                        NodeKind::Code {
                            fenced,
                            lang,
                            value: String::new(),
                        }
                    }
                    Tag::HtmlBlock => NodeKind::Html { value: String::new() },
                    Tag::List(start) => NodeKind::List {
                        ordered: start.is_some(),
                        start,
                    },
                    Tag::Item => NodeKind::ListItem { checked: None },
                    Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition {
                        label: label.to_string(),
                    },
                    Tag::Table(_) => NodeKind::Table,
                    Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
                    Tag::TableCell => NodeKind::TableCell,
                    Tag::Emphasis => NodeKind::Emphasis,
                    Tag::Strong => NodeKind::Strong,
                    Tag::Strikethrough => NodeKind::Delete,
                    Tag::Link { dest_url, title, .. } => NodeKind::Link {
                        url: dest_url.to_string(),
                        title: (!title.is_empty()).then(|| title.to_string()),
                    },
                    Tag::Image { dest_url, title, .. } => NodeKind::Image {
                        url: dest_url.to_string(),
                        title: (!title.is_empty()).then(|| title.to_string()),
                        alt: String::new(),
                    },
                    // Extensions that are not enabled; keep their content reachable
                    _ => NodeKind::Paragraph,
                };
                stack.push(Frame {
                    kind,
                    start: range.start,
                    end: range.end,
                    children: Vec::new(),
                    literal: String::new(),
                });
            }
            Event::End(_) => {
                // The root frame is never closed by an end event
                if stack.len() < 2 {
                    continue;
                }
                let Some(frame) = stack.pop() else { continue };
                let node = finish_frame(frame, content, index);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::Text(text) => {
                let Some(top) = stack.last_mut() else { continue };
                if matches!(top.kind, NodeKind::Code { .. }) {
                    top.literal.push_str(&text);
                } else {
                    push_text(top, &text, range, index);
                }
            }
            Event::SoftBreak => {
                if let Some(top) = stack.last_mut() {
                    push_text(top, "\n", range, index);
                }
            }
            Event::Html(html) => {
                let Some(top) = stack.last_mut() else { continue };
                if matches!(top.kind, NodeKind::Html { .. }) {
                    top.literal.push_str(&html);
                } else {
                    push_leaf(top, NodeKind::Html { value: html.to_string() }, range, index);
                }
            }
            Event::InlineHtml(html) => {
                if let Some(top) = stack.last_mut() {
                    push_leaf(top, NodeKind::Html { value: html.to_string() }, range, index);
                }
            }
            Event::Code(code) => {
                if let Some(top) = stack.last_mut() {
                    push_leaf(top, NodeKind::InlineCode { value: code.to_string() }, range, index);
                }
            }
            Event::HardBreak => {
                if let Some(top) = stack.last_mut() {
                    push_leaf(top, NodeKind::Break, range, index);
                }
            }
            Event::Rule => {
                if let Some(top) = stack.last_mut() {
                    let range = range.start..trim_line_end(content, range.start, range.end);
                    push_leaf(top, NodeKind::ThematicBreak, range, index);
                }
            }
            Event::FootnoteReference(label) => {
                if let Some(top) = stack.last_mut() {
                    push_leaf(
                        top,
                        NodeKind::FootnoteReference {
                            label: label.to_string(),
                        },
                        range,
                        index,
                    );
                }
            }
            Event::TaskListMarker(checked) => {
                if let Some(top) = stack.last_mut()
                    && let NodeKind::ListItem { checked: slot } = &mut top.kind
                {
                    *slot = Some(checked);
                }
            }
            _ => {}
        }
    }

    // Unbalanced input never reaches here with pulldown-cmark, but fold any
    // leftover frames into their parents rather than losing them.
    while stack.len() > 1 {
        if let Some(frame) = stack.pop() {
            let node = finish_frame(frame, content, index);
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            }
        }
    }

    let root = stack.pop().map(|frame| frame.children).unwrap_or_default();
    Node::with_children(NodeKind::Root, span_for(0, content.len(), index), root)
}

fn finish_frame(frame: Frame, content: &str, index: &LineIndex) -> Node {
    let Frame {
        mut kind,
        start,
        end,
        mut children,
        literal,
    } = frame;

    match &mut kind {
        NodeKind::Code { value, .. } => {
            *value = literal.strip_suffix('\n').unwrap_or(&literal).to_string();
        }
        NodeKind::Html { value } => {
            *value = literal.trim_end_matches(['\n', '\r']).to_string();
        }
        NodeKind::Image { alt, .. } => {
            *alt = children.iter().map(to_string).collect();
            children.clear();
        }
        _ => {}
    }

    let end = trim_line_end(content, start, end);
    Node::with_children(kind, span_for(start, end, index), children)
}

/// Drop trailing line endings from a block's byte range
fn trim_line_end(content: &str, start: usize, mut end: usize) -> usize {
    let bytes = content.as_bytes();
    while end > start && matches!(bytes.get(end - 1), Some(b'\n' | b'\r')) {
        end -= 1;
    }
    end
}

fn span_for(start: usize, end: usize, index: &LineIndex) -> Span {
    match (index.to_point(start), index.to_point(end)) {
        (Some(start), Some(end)) => Span::new(start, end),
        _ => Span::synthetic(),
    }
}

fn push_leaf(parent: &mut Frame, kind: NodeKind, range: std::ops::Range<usize>, index: &LineIndex) {
    parent.children.push(Node::new(kind, span_for(range.start, range.end, index)));
}

/// Append text, merging with a directly preceding text node
fn push_text(parent: &mut Frame, text: &str, range: std::ops::Range<usize>, index: &LineIndex) {
    if let Some(Node {
        kind: NodeKind::Text { value },
        position,
        ..
    }) = parent.children.last_mut()
        && let Some(start) = position.start.point()
        && let Some(end) = index.to_point(range.end.max(start.offset))
    {
        value.push_str(text);
        *position = Span::new(start, end);
        return;
    }
    push_leaf(
        parent,
        NodeKind::Text {
            value: text.to_string(),
        },
        range,
        index,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Point, Position};

    fn types(node: &Node) -> Vec<&'static str> {
        let mut out = Vec::new();
        visit(
            node,
            None,
            |n, _, _| {
                out.push(n.type_name());
                VisitControl::Continue
            },
            false,
        );
        out
    }

    #[test]
    fn test_parse_headings_and_paragraphs() {
        let tree = parse("# Venus\n\nSome *text*.\n");
        assert_eq!(
            types(&tree),
            vec!["root", "heading", "text", "paragraph", "text", "emphasis", "text", "text"]
        );

        let heading = &tree.children[0];
        assert_eq!(heading.kind, NodeKind::Heading { depth: 1 });
        assert_eq!(heading.position.start, Position::Real(Point::new(1, 1, 0)));
        assert_eq!(heading.position.end, Position::Real(Point::new(1, 8, 7)));

        let emphasis = &tree.children[1].children[1];
        assert_eq!(emphasis.position.start.offset(), Some(14));
        assert_eq!(to_string(emphasis), "text");
    }

    #[test]
    fn test_root_spans_whole_document() {
        let content = "a\n\nb\n";
        let tree = parse(content);
        assert_eq!(tree.position.start.offset(), Some(0));
        assert_eq!(tree.position.end.offset(), Some(content.len()));
    }

    #[test]
    fn test_html_comment_nodes() {
        let tree = parse("<!--lint disable foo-->\n\ntext <!--inline--> more\n");
        let mut html = Vec::new();
        visit(
            &tree,
            Some("html"),
            |n, _, _| {
                html.push(n.value().unwrap_or_default().to_string());
                VisitControl::Continue
            },
            false,
        );
        assert_eq!(html, vec!["<!--lint disable foo-->", "<!--inline-->"]);
    }

    #[test]
    fn test_code_blocks_keep_value_and_lang() {
        let tree = parse("```rust\nfn main() {}\n```\n\n    indented\n");
        assert_eq!(
            tree.children[0].kind,
            NodeKind::Code {
                fenced: true,
                lang: Some("rust".to_string()),
                value: "fn main() {}".to_string()
            }
        );
        assert_eq!(
            tree.children[1].kind,
            NodeKind::Code {
                fenced: false,
                lang: None,
                value: "indented".to_string()
            }
        );
        assert!(!tree.children[0].is_parent());
    }

    #[test]
    fn test_indented_code_starting_with_fence_text() {
        let tree = parse("Para.\n\n    ```\n    code\n");
        assert!(matches!(tree.children[1].kind, NodeKind::Code { fenced: false, .. }));
    }

    #[test]
    fn test_image_alt_is_flattened() {
        let tree = parse("![a *b*](x.png \"t\")\n");
        let image = &tree.children[0].children[0];
        match &image.kind {
            NodeKind::Image { url, title, alt } => {
                assert_eq!(url, "x.png");
                assert_eq!(title.as_deref(), Some("t"));
                assert_eq!(alt, "a b");
            }
            other => panic!("expected image, got {other:?}"),
        }
        assert!(image.children.is_empty());
    }

    #[test]
    fn test_soft_breaks_merge_into_text() {
        let tree = parse("one\ntwo\n");
        let paragraph = &tree.children[0];
        assert_eq!(paragraph.children.len(), 1);
        assert_eq!(paragraph.children[0].value(), Some("one\ntwo"));
    }

    #[test]
    fn test_visit_skip_and_reverse() {
        let tree = parse("# A\n\n*b* c\n");
        let mut seen = Vec::new();
        visit(
            &tree,
            None,
            |n, _, _| {
                seen.push(n.type_name());
                if n.type_name() == "paragraph" {
                    VisitControl::SkipChildren
                } else {
                    VisitControl::Continue
                }
            },
            true,
        );
        assert_eq!(seen, vec!["root", "paragraph", "heading", "text"]);
    }

    #[test]
    fn test_visit_passes_index_and_parent() {
        let tree = parse("a\n\nb\n");
        let mut found = Vec::new();
        visit(
            &tree,
            Some("paragraph"),
            |_, idx, parent| {
                found.push((idx, parent.map(Node::type_name)));
                VisitControl::Continue
            },
            false,
        );
        assert_eq!(found, vec![(0, Some("root")), (1, Some("root"))]);
    }

    #[test]
    fn test_to_string_prefers_literals() {
        let link = Node::with_children(
            NodeKind::Link {
                url: "u".to_string(),
                title: None,
            },
            Span::synthetic(),
            vec![Node::new(
                NodeKind::Text {
                    value: "label".to_string(),
                },
                Span::synthetic(),
            )],
        );
        assert_eq!(to_string(&link), "label");

        let titled = Node::with_children(
            NodeKind::Link {
                url: "u".to_string(),
                title: Some("title".to_string()),
            },
            Span::synthetic(),
            link.children.clone(),
        );
        assert_eq!(to_string(&titled), "title");
    }
}
