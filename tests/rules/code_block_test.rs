use marklint_lib::lint_context::LintContext;
use marklint_lib::rule::Rule;
use marklint_lib::rules::{CodeBlockStyle, FencedCodeMarker};

#[test]
fn test_fenced_then_indented() {
    let rule = CodeBlockStyle;
    let content = "```\nfenced\n```\n\nText\n\n    indented\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line, 7);
    assert_eq!(result[0].message, "Code blocks should be fenced");
}

#[test]
fn test_indented_preference() {
    let rule = CodeBlockStyle;
    let content = "    indented\n\nText\n\n~~~sh\nls\n~~~\n";
    let ctx = LintContext::new(content);
    let option = toml::Value::String("indented".to_string());
    let result = rule.check(&ctx, Some(&option)).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line, 5);
    assert_eq!(result[0].message, "Code blocks should be indented");
}

#[test]
fn test_fence_markers() {
    let rule = FencedCodeMarker;
    let content = "```js\na\n```\n\n~~~js\nb\n~~~\n\n    indented\n";
    let ctx = LintContext::new(content);
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].line, 5);
    assert_eq!(result[0].message, "Fenced code should use `` ` `` as a marker");
}

#[test]
fn test_tilde_preference() {
    let rule = FencedCodeMarker;
    let content = "```\na\n```\n";
    let ctx = LintContext::new(content);
    let option = toml::Value::String("~".to_string());
    let result = rule.check(&ctx, Some(&option)).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].message, "Fenced code should use `~` as a marker");
}
