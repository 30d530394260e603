use marklint_lib::lint_context::LintContext;
use marklint_lib::rule::{LintError, Rule};
use marklint_lib::rules::{EmphasisMarker, RuleStyle, StrongMarker};

fn option(value: &str) -> toml::Value {
    toml::Value::String(value.to_string())
}

#[test]
fn test_emphasis_consistency_ignores_strong() {
    let rule = EmphasisMarker;
    let ctx = LintContext::new("*a* and __b__ and *c*\n");
    assert!(rule.check(&ctx, None).unwrap().is_empty());
}

#[test]
fn test_emphasis_invalid_marker() {
    let rule = EmphasisMarker;
    let ctx = LintContext::new("*a*\n");
    let err = rule.check(&ctx, Some(&option("@"))).unwrap_err();
    assert!(matches!(err, LintError::InvalidOption { .. }));
}

#[test]
fn test_strong_mixed() {
    let rule = StrongMarker;
    let ctx = LintContext::new("**a** and __b__\n");
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!((result[0].line, result[0].column), (1, 11));
    assert_eq!(result[0].message, "Strong should use `*` as a marker");
}

#[test]
fn test_strong_preference() {
    let rule = StrongMarker;
    let ctx = LintContext::new("**a**\n");
    let result = rule.check(&ctx, Some(&option("_"))).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].message, "Strong should use `_` as a marker");
}

#[test]
fn test_rule_style_nested_in_list() {
    let rule = RuleStyle;
    let ctx = LintContext::new("---\n\n- item\n\n  ***\n");
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line, 5);
    assert_eq!(result[0].message, "Rules should use `---`");
}
