use crate::lint_context::LintContext;
use crate::mdast::{self, NodeKind, VisitControl};
use crate::position::is_generated;
use crate::rule::{LintResult, LintWarning, Rule};
use regex::Regex;
use std::sync::LazyLock;

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?|ftp)://[^\s<>()\[\]]+|mailto:[^\s<>()\[\]]+@[^\s<>()\[\]]+").unwrap());

/// Characters that end a sentence rather than a URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '*', '_', '~'];

/// URLs must be written as `<https://...>` or as links, never bare
#[derive(Debug, Clone, Default)]
pub struct NoLiteralUrls;

impl Rule for NoLiteralUrls {
    fn name(&self) -> &'static str {
        "no-literal-urls"
    }

    fn description(&self) -> &'static str {
        "Literal URLs without angle brackets"
    }

    fn check(&self, ctx: &LintContext, _option: Option<&toml::Value>) -> LintResult {
        let mut warnings = Vec::new();

        mdast::visit(
            &ctx.tree,
            None,
            |node, _, _| {
                match node.kind {
                    // Autolinks and inline links are fine as they are
                    NodeKind::Link { .. } | NodeKind::Image { .. } => return VisitControl::SkipChildren,
                    NodeKind::Text { .. } if !is_generated(node) => {}
                    _ => return VisitControl::Continue,
                }
                let (Some(source), Some(range)) = (ctx.slice(node), node.position.byte_range()) else {
                    return VisitControl::Continue;
                };

                for found in BARE_URL.find_iter(source) {
                    let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
                    let start = range.start + found.start();
                    let end = start + url.len();
                    if let (Some(from), Some(to)) = (ctx.point_of(start), ctx.point_of(end)) {
                        warnings.push(LintWarning::between(
                            from,
                            to,
                            "Don't use literal URLs without angle brackets",
                        ));
                    }
                }
                VisitControl::Continue
            },
            false,
        );

        Ok(warnings)
    }
}
