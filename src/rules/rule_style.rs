use crate::lint_context::LintContext;
use crate::mdast::{self, VisitControl};
use crate::position::is_generated;
use crate::rule::{LintResult, LintWarning, Rule};
use crate::rules::consistency::{ConsistencyTracker, Observation, StyleOption};

/// Whether `s` is a thematic break on its own: three or more of one of
/// `*`, `-`, `_`, optionally separated by spaces or tabs
fn is_thematic_break(s: &str) -> bool {
    let mut marks = s.chars().filter(|c| !matches!(c, ' ' | '\t'));
    let Some(first @ ('*' | '-' | '_')) = marks.next() else {
        return false;
    };
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

/// Thematic breaks are written the same way throughout
#[derive(Debug, Clone, Default)]
pub struct RuleStyle;

impl Rule for RuleStyle {
    fn name(&self) -> &'static str {
        "rule-style"
    }

    fn description(&self) -> &'static str {
        "Thematic break style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(
            option,
            |s| is_thematic_break(s).then(|| s.to_string()),
            |_| "Incorrect preferred rule style: provide a correct markdown rule or `'consistent'`".to_string(),
        )?;
        let mut tracker = ConsistencyTracker::new(option);
        let mut warnings = Vec::new();

        mdast::visit(
            &ctx.tree,
            Some("thematicBreak"),
            |node, _, _| {
                if is_generated(node) {
                    return VisitControl::Continue;
                }
                let Some(source) = ctx.slice(node) else {
                    return VisitControl::Continue;
                };
                if let Observation::Mismatch { expected } = tracker.observe(source.trim().to_string()) {
                    warnings.push(LintWarning::at_node(node, format!("Rules should use `{expected}`")));
                }
                VisitControl::Continue
            },
            false,
        );

        Ok(warnings)
    }
}
