use crate::lint_context::LintContext;
use crate::mdast::{self, VisitControl};
use crate::position::is_generated;
use crate::rule::{LintResult, LintWarning, Rule};
use crate::rules::consistency::{ConsistencyTracker, Observation, StyleOption, expected_one_of};

/// Parse an emphasis or strong marker option
pub(crate) fn parse_marker(s: &str) -> Option<char> {
    match s {
        "*" => Some('*'),
        "_" => Some('_'),
        _ => None,
    }
}

/// Check that every `kind` node (`emphasis` or `strong`) opens with the
/// preferred marker character.
pub(crate) fn check_markers(
    ctx: &LintContext,
    kind: &str,
    option: StyleOption<char>,
    message: impl Fn(char) -> String,
) -> Vec<LintWarning> {
    let mut tracker = ConsistencyTracker::new(option);
    let mut warnings = Vec::new();

    mdast::visit(
        &ctx.tree,
        Some(kind),
        |node, _, _| {
            if is_generated(node) {
                return VisitControl::Continue;
            }
            let marker = ctx.source_from(node).and_then(|rest| rest.chars().next());
            if let Some(marker @ ('*' | '_')) = marker
                && let Observation::Mismatch { expected } = tracker.observe(marker)
            {
                warnings.push(LintWarning::at_node(node, message(expected)));
            }
            VisitControl::Continue
        },
        false,
    );

    warnings
}

/// Emphasis uses one marker throughout: `*` or `_`
#[derive(Debug, Clone, Default)]
pub struct EmphasisMarker;

impl Rule for EmphasisMarker {
    fn name(&self) -> &'static str {
        "emphasis-marker"
    }

    fn description(&self) -> &'static str {
        "Emphasis marker style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(option, parse_marker, |value| {
            expected_one_of("emphasis marker", value, &["*", "_"])
        })?;
        Ok(check_markers(ctx, "emphasis", option, |expected| {
            format!("Emphasis should use `{expected}` as a marker")
        }))
    }
}
