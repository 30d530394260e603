//! Inline configuration comments
//!
//! Supports, with the default marker name `lint`:
//! - `<!--lint disable no-literal-urls-->` - Disable a rule from this point
//! - `<!--lint enable no-literal-urls-->` - Re-enable it from this point
//! - `<!--lint disable rule-a rule-b-->` - Several rules at once
//! - `<!--lint disable-->` - Every known rule
//!
//! Markers are `html` nodes of the parsed tree, so comments inside code
//! blocks or code spans are never picked up. Each directive is recorded as a
//! [`ZoneEvent`] in a per-document [`ZoneTable`], which the filter consults
//! afterwards.

use crate::mdast::{self, Node, VisitControl};
use crate::position::is_generated;
use crate::rule::LintWarning;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `<!-- name attributes -->`, alone in its node
static COMMENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!--\s*([a-zA-Z0-9-]+)(?:\s+([\s\S]*?))?\s*-->\s*$").unwrap());

/// Default comment name: `<!--lint ...-->`
pub const DEFAULT_MARKER_NAME: &str = "lint";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `<!--name start-->`
    Start,
    /// `<!--name end-->`
    End,
    /// Any other attributes, e.g. `<!--name disable rule-->`
    Marker,
}

/// A recognised comment marker
#[derive(Debug, Clone, Copy)]
pub struct Marker<'a> {
    pub kind: MarkerKind,
    pub attributes: &'a str,
    pub node: &'a Node,
}

/// Call `callback` for every comment node named `name`, in document order
pub fn find_markers<'a, F>(tree: &'a Node, name: &str, mut callback: F)
where
    F: FnMut(Marker<'a>),
{
    mdast::visit(
        tree,
        Some("html"),
        |node, _, _| {
            if let Some(marker) = parse_marker(node, name) {
                callback(marker);
            }
            VisitControl::Continue
        },
        false,
    );
}

/// Recognise a single node as a marker named `name`
pub fn parse_marker<'a>(node: &'a Node, name: &str) -> Option<Marker<'a>> {
    let value = node.value()?;
    let caps = COMMENT_MARKER.captures(value)?;
    if caps.get(1)?.as_str() != name {
        return None;
    }
    let attributes = caps.get(2).map_or("", |m| m.as_str().trim());
    let kind = match attributes {
        "start" => MarkerKind::Start,
        "end" => MarkerKind::End,
        _ => MarkerKind::Marker,
    };
    Some(Marker { kind, attributes, node })
}

/// State change for one rule, effective after its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneEvent {
    pub enabled: bool,
    /// Line number (1-indexed; 0 for the seed event)
    pub line: usize,
    /// Column number (1-indexed; 0 for the seed event)
    pub column: usize,
}

impl ZoneEvent {
    /// Whether this event lies strictly before the given position
    pub fn precedes(&self, line: usize, column: usize) -> bool {
        self.line < line || (self.line == line && self.column < column)
    }
}

/// Enable/disable events per rule id for a single document
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    events: HashMap<String, Vec<ZoneEvent>>,
    /// Fatal messages for malformed markers
    errors: Vec<LintWarning>,
}

impl ZoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `tree` for markers named `marker_name`.
    ///
    /// `defaults` lists every known rule id with its default enabled state;
    /// it seeds the table when the first marker is found and is the set of
    /// ids markers may refer to.
    pub fn from_tree(tree: &Node, marker_name: &str, defaults: &[(&str, bool)]) -> Self {
        let mut table = Self::new();
        find_markers(tree, marker_name, |marker| {
            if marker.kind == MarkerKind::Marker {
                table.apply(&marker, defaults);
            }
        });
        table
    }

    fn seed(&mut self, defaults: &[(&str, bool)]) {
        for &(rule, enabled) in defaults {
            self.events.entry(rule.to_string()).or_insert_with(|| {
                vec![ZoneEvent {
                    enabled,
                    line: 0,
                    column: 0,
                }]
            });
        }
    }

    /// Record the directive carried by one marker
    pub fn apply(&mut self, marker: &Marker<'_>, defaults: &[(&str, bool)]) {
        if is_generated(marker.node) {
            return;
        }
        let Some(start) = marker.node.position.start.point() else {
            return;
        };

        if self.events.is_empty() {
            self.seed(defaults);
        }

        let mut words = marker.attributes.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let enabled = match verb {
            "enable" => true,
            "disable" => false,
            _ => {
                self.errors.push(
                    LintWarning::at_node(
                        marker.node,
                        format!("Unknown keyword `{verb}`: expected `'enable'` or `'disable'`"),
                    )
                    .fatal(),
                );
                return;
            }
        };

        let ids: Vec<&str> = words.collect();
        let targets: Vec<&str> = if ids.is_empty() {
            defaults.iter().map(|&(rule, _)| rule).collect()
        } else {
            ids
        };

        for rule in targets {
            if !defaults.iter().any(|&(known, _)| known == rule) {
                self.errors.push(
                    LintWarning::at_node(marker.node, format!("Unknown rule: cannot {verb} `'{rule}'`")).fatal(),
                );
                continue;
            }

            let events = self.events.entry(rule.to_string()).or_default();
            let current = events.last().map(|event| event.enabled);
            if current != Some(enabled) {
                log::debug!("{verb} {rule} at {}:{}", start.line, start.column);
                events.push(ZoneEvent {
                    enabled,
                    line: start.line,
                    column: start.column,
                });
            }
        }
    }

    /// Replace the events of one rule; they must be in position order
    pub fn insert(&mut self, rule: impl Into<String>, events: Vec<ZoneEvent>) {
        debug_assert!(events.windows(2).all(|w| (w[0].line, w[0].column) <= (w[1].line, w[1].column)));
        self.events.insert(rule.into(), events);
    }

    /// Events recorded for a rule, oldest first
    pub fn events(&self, rule: &str) -> Option<&[ZoneEvent]> {
        self.events.get(rule).map(Vec::as_slice)
    }

    /// State of `rule` at a position: the state of the nearest event strictly
    /// before it. `None` when no marker ever touched the document.
    pub fn state_at(&self, rule: &str, line: usize, column: usize) -> Option<bool> {
        let events = self.events.get(rule)?;
        events
            .iter()
            .rev()
            .find(|event| event.precedes(line, column))
            .map(|event| event.enabled)
    }

    /// Whether any event switches `rule` on
    pub fn is_ever_enabled(&self, rule: &str) -> bool {
        self.events
            .get(rule)
            .is_some_and(|events| events.iter().any(|event| event.enabled))
    }

    /// Messages for markers that could not be applied
    pub fn errors(&self) -> &[LintWarning] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<LintWarning> {
        std::mem::take(&mut self.errors)
    }
}
