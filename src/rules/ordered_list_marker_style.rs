use crate::lint_context::LintContext;
use crate::rule::{LintResult, LintWarning, Rule};
use crate::rules::consistency::{ConsistencyTracker, Observation, StyleOption, expected_one_of};
use crate::rules::unordered_list_marker_style::{for_each_item, item_marker_source};

/// Ordered lists use one delimiter throughout: `1.` or `1)`
#[derive(Debug, Clone, Default)]
pub struct OrderedListMarkerStyle;

impl Rule for OrderedListMarkerStyle {
    fn name(&self) -> &'static str {
        "ordered-list-marker-style"
    }

    fn description(&self) -> &'static str {
        "Ordered list item marker style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(
            option,
            |s| match s {
                "." | ")" => s.chars().next(),
                _ => None,
            },
            |value| expected_one_of("ordered list item marker style", value, &[".", ")"]),
        )?;
        let mut tracker = ConsistencyTracker::new(option);
        let mut warnings = Vec::new();

        for_each_item(ctx, true, |item| {
            let delimiter = item_marker_source(ctx, item)
                .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_digit()))
                .and_then(|rest| rest.chars().next());
            if let Some(delimiter @ ('.' | ')')) = delimiter
                && let Observation::Mismatch { expected } = tracker.observe(delimiter)
            {
                warnings.push(LintWarning::at_node(item, format!("Marker style should be `{expected}`")));
            }
        });

        Ok(warnings)
    }
}
