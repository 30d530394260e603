use marklint_lib::lint_context::LintContext;
use marklint_lib::rule::Rule;
use marklint_lib::rules::{OrderedListMarkerStyle, UnorderedListMarkerStyle};

#[test]
fn test_unordered_consistent() {
    let rule = UnorderedListMarkerStyle;
    let ctx = LintContext::new("- a\n- b\n  - nested\n");
    assert!(rule.check(&ctx, None).unwrap().is_empty());
}

#[test]
fn test_unordered_first_marker_wins() {
    let rule = UnorderedListMarkerStyle;
    let content = "* a\n* b\n\n- c\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!((result[0].line, result[0].column), (4, 1));
    assert_eq!(result[0].message, "Marker style should be `*`");
}

#[test]
fn test_unordered_preference() {
    let rule = UnorderedListMarkerStyle;
    let ctx = LintContext::new("+ a\n+ b\n");
    let option = toml::Value::String("-".to_string());
    let result = rule.check(&ctx, Some(&option)).unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|w| w.message == "Marker style should be `-`"));
}

#[test]
fn test_ordered_mixed_delimiters() {
    let rule = OrderedListMarkerStyle;
    let content = "1. a\n2. b\n\n1) c\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line, 4);
    assert_eq!(result[0].message, "Marker style should be `.`");
}

#[test]
fn test_ordered_ignores_bullet_lists() {
    let rule = OrderedListMarkerStyle;
    let ctx = LintContext::new("- a\n- b\n");
    assert!(rule.check(&ctx, None).unwrap().is_empty());
}
