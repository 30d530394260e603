use crate::mdast::{self, Node};
use crate::position::{LineIndex, Point};

/// Everything a rule needs about one document: the source text, its parsed
/// tree and the line table used to resolve positions.
pub struct LintContext<'a> {
    pub content: &'a str,
    pub tree: Node,
    pub line_index: LineIndex,
}

impl<'a> LintContext<'a> {
    /// Parse `content` and build the line table once
    pub fn new(content: &'a str) -> Self {
        let line_index = LineIndex::new(content);
        let tree = mdast::parse_with_index(content, &line_index);
        Self {
            content,
            tree,
            line_index,
        }
    }

    /// Use a tree produced elsewhere; its positions must refer to `content`
    pub fn from_tree(content: &'a str, tree: Node) -> Self {
        Self {
            content,
            tree,
            line_index: LineIndex::new(content),
        }
    }

    /// Start point of a node, `None` for generated nodes
    pub fn start(&self, node: &Node) -> Option<Point> {
        node.position.start.point()
    }

    /// End point of a node, `None` for generated nodes
    pub fn end(&self, node: &Node) -> Option<Point> {
        node.position.end.point()
    }

    /// Resolve a byte offset to a point
    pub fn point_of(&self, offset: usize) -> Option<Point> {
        self.line_index.to_point(offset)
    }

    /// Source text covered by a node
    pub fn slice(&self, node: &Node) -> Option<&'a str> {
        let range = node.position.byte_range()?;
        self.content.get(range)
    }

    /// Source text from a node's start to the end of the document
    pub fn source_from(&self, node: &Node) -> Option<&'a str> {
        let offset = node.position.start.offset()?;
        self.content.get(offset..)
    }
}
