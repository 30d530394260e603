use marklint_lib::lint_context::LintContext;
use marklint_lib::rule::Rule;
use marklint_lib::rules::NoLiteralUrls;

#[test]
fn test_bare_url() {
    let rule = NoLiteralUrls;
    let ctx = LintContext::new("Visit https://example.com.\n");
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!((result[0].line, result[0].column), (1, 7));
    assert_eq!((result[0].end_line, result[0].end_column), (1, 26));
}

#[test]
fn test_links_and_autolinks_are_fine() {
    let rule = NoLiteralUrls;
    let content = "See <https://example.com> and [docs](https://example.com/docs).\n";
    let ctx = LintContext::new(content);
    assert!(rule.check(&ctx, None).unwrap().is_empty());
}

#[test]
fn test_url_in_code_is_fine() {
    let rule = NoLiteralUrls;
    let content = "Run `curl https://example.com`.\n\n```\nhttps://example.com\n```\n";
    let ctx = LintContext::new(content);
    assert!(rule.check(&ctx, None).unwrap().is_empty());
}

#[test]
fn test_url_on_later_line() {
    let rule = NoLiteralUrls;
    let ctx = LintContext::new("First line\nand https://example.com/a\n");
    let result = rule.check(&ctx, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!((result[0].line, result[0].column), (2, 5));
}
