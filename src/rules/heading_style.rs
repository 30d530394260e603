use crate::lint_context::LintContext;
use crate::mdast::{self, Node, NodeKind, VisitControl};
use crate::position::is_generated;
use crate::rule::{LintResult, LintWarning, Rule};
use crate::rules::consistency::{ConsistencyTracker, Observation, StyleOption, expected_one_of};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    /// `# Heading`
    Atx,
    /// `# Heading #`
    AtxClosed,
    /// `Heading` underlined with `=` or `-`
    Setext,
}

impl HeadingStyle {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "atx" => Some(HeadingStyle::Atx),
            "atx-closed" => Some(HeadingStyle::AtxClosed),
            "setext" => Some(HeadingStyle::Setext),
            _ => None,
        }
    }

    /// Style of a heading as written in `source`
    fn detect(source: &str) -> Self {
        let first_line = source.lines().next().unwrap_or_default().trim();
        if !first_line.starts_with('#') {
            return HeadingStyle::Setext;
        }
        let content = first_line.trim_start_matches('#');
        let unclosed = content.trim_end_matches('#');
        if unclosed.len() < content.len() && (unclosed.is_empty() || unclosed.ends_with([' ', '\t'])) {
            HeadingStyle::AtxClosed
        } else {
            HeadingStyle::Atx
        }
    }
}

impl fmt::Display for HeadingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingStyle::Atx => write!(f, "atx"),
            HeadingStyle::AtxClosed => write!(f, "atx-closed"),
            HeadingStyle::Setext => write!(f, "setext"),
        }
    }
}

/// Headings use one style throughout
#[derive(Debug, Clone, Default)]
pub struct HeadingStyleRule;

fn heading_depth(node: &Node) -> u8 {
    match node.kind {
        NodeKind::Heading { depth } => depth,
        _ => 0,
    }
}

impl Rule for HeadingStyleRule {
    fn name(&self) -> &'static str {
        "heading-style"
    }

    fn description(&self) -> &'static str {
        "Heading style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(option, HeadingStyle::parse, |value| {
            expected_one_of("heading style", value, &["atx", "atx-closed", "setext"])
        })?;
        let mut tracker = ConsistencyTracker::new(option);
        let mut warnings = Vec::new();

        mdast::visit(
            &ctx.tree,
            Some("heading"),
            |node, _, _| {
                if is_generated(node) {
                    return VisitControl::Continue;
                }
                // Setext only exists for the first two levels
                if tracker.preferred() == Some(&HeadingStyle::Setext) && heading_depth(node) > 2 {
                    return VisitControl::Continue;
                }
                let Some(source) = ctx.slice(node) else {
                    return VisitControl::Continue;
                };
                if let Observation::Mismatch { expected } = tracker.observe(HeadingStyle::detect(source)) {
                    warnings.push(LintWarning::at_node(node, format!("Headings should use {expected}")));
                }
                VisitControl::Continue
            },
            false,
        );

        Ok(warnings)
    }
}
