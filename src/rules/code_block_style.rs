use crate::lint_context::LintContext;
use crate::mdast::{self, Node, NodeKind, VisitControl};
use crate::position::is_generated;
use crate::rule::{LintResult, LintWarning, Rule};
use crate::rules::consistency::{ConsistencyTracker, Observation, StyleOption, expected_one_of};

/// Whether a code node was written with a fence rather than indentation
pub(crate) fn is_fenced(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Code { fenced: true, .. })
}

/// Fence character of a fenced code node, `None` for indented code
pub(crate) fn fence_marker(ctx: &LintContext, node: &Node) -> Option<char> {
    if !is_fenced(node) {
        return None;
    }
    ctx.source_from(node)
        .and_then(|rest| rest.trim_start_matches([' ', '\t']).chars().next())
        .filter(|c| matches!(c, '`' | '~'))
}

/// Code blocks are either all fenced or all indented
#[derive(Debug, Clone, Default)]
pub struct CodeBlockStyle;

impl Rule for CodeBlockStyle {
    fn name(&self) -> &'static str {
        "code-block-style"
    }

    fn description(&self) -> &'static str {
        "Code block style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(
            option,
            |s| match s {
                "fenced" => Some(true),
                "indented" => Some(false),
                _ => None,
            },
            |value| expected_one_of("code block style", value, &["fenced", "indented"]),
        )?;
        let mut tracker = ConsistencyTracker::new(option);
        let mut warnings = Vec::new();

        mdast::visit(
            &ctx.tree,
            Some("code"),
            |node, _, _| {
                if is_generated(node) {
                    return VisitControl::Continue;
                }
                let fenced = is_fenced(node);
                if let Observation::Mismatch { expected } = tracker.observe(fenced) {
                    let style = if expected { "fenced" } else { "indented" };
                    warnings.push(LintWarning::at_node(node, format!("Code blocks should be {style}")));
                }
                VisitControl::Continue
            },
            false,
        );

        Ok(warnings)
    }
}
