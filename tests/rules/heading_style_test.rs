use marklint_lib::lint_context::LintContext;
use marklint_lib::rule::Rule;
use marklint_lib::rules::HeadingStyleRule;

fn option(value: &str) -> toml::Value {
    toml::Value::String(value.to_string())
}

#[test]
fn test_consistent_atx() {
    let rule = HeadingStyleRule;
    let content = "# Heading 1\n\n## Heading 2\n\n### Heading 3\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, None).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_consistent_atx_closed() {
    let rule = HeadingStyleRule;
    let content = "# Heading 1 #\n\n## Heading 2 ##\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, Some(&option("atx-closed"))).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_mixed_styles() {
    let rule = HeadingStyleRule;
    let content = "# Heading 1\n\n## Heading 2 ##\n\n### Heading 3\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line, 3);
    assert_eq!(result[0].message, "Headings should use atx");
}

#[test]
fn test_setext_first_sets_the_style() {
    let rule = HeadingStyleRule;
    let content = "Title\n=====\n\n## Section\n\nSub\n---\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line, 4);
    assert_eq!(result[0].message, "Headings should use setext");
}

#[test]
fn test_setext_ignores_deep_headings() {
    let rule = HeadingStyleRule;
    let content = "Title\n=====\n\n### Deep\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, Some(&option("setext"))).unwrap();
    assert!(result.is_empty());
}
