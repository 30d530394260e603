use crate::lint_context::LintContext;
use crate::mdast::{self, Node, NodeKind, VisitControl};
use crate::position::is_generated;
use crate::rule::{LintResult, LintWarning, Rule};
use crate::rules::consistency::{ConsistencyTracker, Observation, StyleOption, expected_one_of};

/// Source of a list item starting at its marker
pub(crate) fn item_marker_source<'a>(ctx: &LintContext<'a>, item: &Node) -> Option<&'a str> {
    ctx.source_from(item).map(str::trim_start)
}

/// Visit the items of every real list for which `ordered` matches
pub(crate) fn for_each_item<'a, F>(ctx: &'a LintContext, ordered: bool, mut f: F)
where
    F: FnMut(&'a Node),
{
    mdast::visit(
        &ctx.tree,
        Some("list"),
        |list, _, _| {
            if matches!(list.kind, NodeKind::List { ordered: o, .. } if o == ordered) {
                list.children
                    .iter()
                    .filter(|item| !is_generated(item))
                    .for_each(&mut f);
            }
            VisitControl::Continue
        },
        false,
    );
}

/// Bullet lists use one marker throughout: `-`, `*` or `+`
#[derive(Debug, Clone, Default)]
pub struct UnorderedListMarkerStyle;

impl Rule for UnorderedListMarkerStyle {
    fn name(&self) -> &'static str {
        "unordered-list-marker-style"
    }

    fn description(&self) -> &'static str {
        "Unordered list item marker style"
    }

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult {
        let option = StyleOption::from_option(
            option,
            |s| match s {
                "-" | "*" | "+" => s.chars().next(),
                _ => None,
            },
            |value| expected_one_of("unordered list item marker style", value, &["-", "*", "+"]),
        )?;
        let mut tracker = ConsistencyTracker::new(option);
        let mut warnings = Vec::new();

        for_each_item(ctx, false, |item| {
            let marker = item_marker_source(ctx, item).and_then(|rest| rest.chars().next());
            if let Some(marker @ ('-' | '*' | '+')) = marker
                && let Observation::Mismatch { expected } = tracker.observe(marker)
            {
                warnings.push(LintWarning::at_node(item, format!("Marker style should be `{expected}`")));
            }
        });

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(content: &str, option: Option<&str>) -> LintResult {
        let ctx = LintContext::new(content);
        let option = option.map(|o| toml::Value::String(o.to_string()));
        UnorderedListMarkerStyle.check(&ctx, option.as_ref())
    }

    #[test]
    fn test_consistent_markers() {
        assert!(check("- a\n- b\n\n1. c\n", None).unwrap().is_empty());
    }

    #[test]
    fn test_mixed_markers() {
        let warnings = check("- a\n- b\n\n* c\n\n- d\n", None).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!((warnings[0].line, warnings[0].column), (4, 1));
        assert_eq!(warnings[0].message, "Marker style should be `-`");
    }

    #[test]
    fn test_nested_lists() {
        let warnings = check("* a\n  + b\n", Some("*")).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 2);
    }

    #[test]
    fn test_invalid_option() {
        let err = check("- a\n", Some("x")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Incorrect unordered list item marker style `x`: use either `'consistent'`, `'-'`, `'*'`, or `'+'`"
        );
    }
}
