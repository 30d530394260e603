use crate::lint_context::LintContext;
use crate::mdast::{self, NodeKind, VisitControl};
use crate::position::{Point, is_generated};
use crate::rule::{LintError, LintResult, LintWarning, Rule};

const DEFAULT_DEPTH: u8 = 1;

/// Only one heading at the "top level" depth (configurable, default 1)
#[derive(Debug, Clone, Default)]
pub struct NoMultipleToplevelHeadings;

fn resolve_depth(option: Option<&toml::Value>) -> Result<u8, LintError> {
    match option {
        None => Ok(DEFAULT_DEPTH),
        Some(toml::Value::Integer(depth)) if (1..=6).contains(depth) => Ok(*depth as u8),
        Some(other) => Err(LintError::invalid_option(format!(
            "Incorrect heading depth `{other}`: use a number between 1 and 6"
        ))),
    }
}

impl Rule for NoMultipleToplevelHeadings {
    fn name(&self) -> &'static str {
        "no-multiple-toplevel-headings"
    }

    fn description(&self) -> &'static str {
        "Multiple top level headings in one document"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let depth = resolve_depth(option)?;
        let mut first: Option<Point> = None;
        let mut warnings = Vec::new();

        mdast::visit(
            &ctx.tree,
            Some("heading"),
            |node, _, _| {
                if is_generated(node) || !matches!(node.kind, NodeKind::Heading { depth: d } if d == depth) {
                    return VisitControl::Continue;
                }
                match first {
                    None => first = ctx.start(node),
                    Some(at) => warnings.push(LintWarning::at_node(
                        node,
                        format!("Don't use multiple top level headings ({}:{})", at.line, at.column),
                    )),
                }
                VisitControl::Continue
            },
            false,
        );

        Ok(warnings)
    }
}
