use crate::lint_context::LintContext;
use crate::rule::{LintResult, Rule};
use crate::rules::consistency::{StyleOption, expected_one_of};
use crate::rules::emphasis_marker::{check_markers, parse_marker};

/// Strong emphasis uses one marker throughout: `**` or `__`
#[derive(Debug, Clone, Default)]
pub struct StrongMarker;

impl Rule for StrongMarker {
    fn name(&self) -> &'static str {
        "strong-marker"
    }

    fn description(&self) -> &'static str {
        "Strong marker style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(option, parse_marker, |value| {
            expected_one_of("strong marker", value, &["*", "_"])
        })?;
        Ok(check_markers(ctx, "strong", option, |expected| {
            format!("Strong should use `{expected}` as a marker")
        }))
    }
}
