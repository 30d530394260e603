use crate::lint_context::LintContext;
use crate::mdast::{self, VisitControl};
use crate::position::is_generated;
use crate::rule::{LintResult, LintWarning, Rule};
use crate::rules::code_block_style::fence_marker;
use crate::rules::consistency::{ConsistencyTracker, Observation, StyleOption};

/// Fenced code uses one fence character throughout: `` ` `` or `~`
#[derive(Debug, Clone, Default)]
pub struct FencedCodeMarker;

impl Rule for FencedCodeMarker {
    fn name(&self) -> &'static str {
        "fenced-code-marker"
    }

    fn description(&self) -> &'static str {
        "Fenced code marker style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(
            option,
            |s| match s {
                "`" | "~" => s.chars().next(),
                _ => None,
            },
            |value| format!("Incorrect fenced code marker `{value}`: use either `'consistent'`, `` '`' ``, or `'~'`"),
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
                if let Some(marker) = fence_marker(ctx, node)
                    && let Observation::Mismatch { expected } = tracker.observe(marker)
                {
                    let shown = if expected == '`' { "`` ` ``" } else { "`~`" };
                    warnings.push(LintWarning::at_node(node, format!("Fenced code should use {shown} as a marker")));
                }
                VisitControl::Continue
            },
            false,
        );

        Ok(warnings)
    }
}
