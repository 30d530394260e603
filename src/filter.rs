//! Post-processing of a document's warnings
//!
//! After every rule has run, warnings are dropped when they land in a region
//! the parser did not attribute to any node ("gaps") or inside a range where
//! their rule was switched off by a marker. Survivors are sorted by position.

use crate::inline_config::ZoneTable;
use crate::mdast::Node;
use crate::position::LineIndex;
use crate::rule::LintWarning;

/// Byte range `[start, end)` not covered by any node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub start: usize,
    pub end: usize,
}

impl Gap {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// What the traversal learned about one node boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landmark {
    Known(usize),
    /// A generated node: its extent is not known
    Unknown,
}

fn collect_landmarks(node: &Node, landmarks: &mut Vec<Landmark>) {
    match node.position.byte_range() {
        Some(range) => {
            landmarks.push(Landmark::Known(range.start));
            if !node.is_parent() {
                landmarks.push(Landmark::Known(range.end));
            }
        }
        None => landmarks.push(Landmark::Unknown),
    }
    for child in &node.children {
        collect_landmarks(child, landmarks);
    }
}

/// Find stretches of `content` that the tree does not account for.
///
/// Landmarks are collected in document order, then folded: the covered
/// offset only ever moves forward, and a forward jump that follows a node of
/// unknown extent leaves a gap behind it. Trailing text after the last
/// top-level node is a gap too, unless it is only whitespace.
pub fn compute_gaps(tree: &Node, content: &str) -> Vec<Gap> {
    let mut landmarks = Vec::new();
    collect_landmarks(tree, &mut landmarks);

    let mut gaps = Vec::new();
    let mut covered = 0;
    let mut pending = false;
    for landmark in landmarks {
        match landmark {
            Landmark::Unknown => pending = true,
            Landmark::Known(offset) if offset > covered => {
                if pending {
                    gaps.push(Gap {
                        start: covered,
                        end: offset,
                    });
                    pending = false;
                }
                covered = offset;
            }
            Landmark::Known(_) => {}
        }
    }

    let last_end = tree.children.last().and_then(|node| node.position.end.offset());
    if last_end == Some(covered)
        && let Some(rest) = content.get(covered..)
        && !rest.trim().is_empty()
    {
        gaps.push(Gap {
            start: covered,
            end: content.len(),
        });
    }

    gaps
}

/// Keep the warnings that are outside every gap and whose rule is enabled
/// at their position.
///
/// Unknown lines and columns (0) are normalized to 1 first. Warnings without
/// a rule name are never filtered.
pub fn filter_warnings(
    warnings: Vec<LintWarning>,
    zones: &ZoneTable,
    gaps: &[Gap],
    line_index: &LineIndex,
) -> Vec<LintWarning> {
    warnings
        .into_iter()
        .map(|mut warning| {
            warning.line = warning.line.max(1);
            warning.column = warning.column.max(1);
            warning
        })
        .filter(|warning| {
            let Some(rule) = warning.rule_name.as_deref() else {
                return true;
            };

            if let Some(offset) = line_index.to_offset(warning.line, warning.column)
                && gaps.iter().any(|gap| gap.contains(offset))
            {
                log::debug!("Dropping {rule} warning at {}:{} inside a gap", warning.line, warning.column);
                return false;
            }

            zones.state_at(rule, warning.line, warning.column).unwrap_or(true)
        })
        .collect()
}

/// Order warnings by line, then column. Equal positions keep their order.
pub fn sort_warnings(warnings: &mut [LintWarning]) {
    warnings.sort_by_key(|warning| (warning.line, warning.column));
}
