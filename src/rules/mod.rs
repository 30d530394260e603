pub mod consistency;

mod code_block_style;
mod emphasis_marker;
mod fenced_code_marker;
mod heading_style;
mod no_literal_urls;
mod no_multiple_toplevel_headings;
mod ordered_list_marker_style;
mod rule_style;
mod strong_marker;
mod unordered_list_marker_style;

pub use code_block_style::CodeBlockStyle;
pub use emphasis_marker::EmphasisMarker;
pub use fenced_code_marker::FencedCodeMarker;
pub use heading_style::{HeadingStyle, HeadingStyleRule};
pub use no_literal_urls::NoLiteralUrls;
pub use no_multiple_toplevel_headings::NoMultipleToplevelHeadings;
pub use ordered_list_marker_style::OrderedListMarkerStyle;
pub use rule_style::RuleStyle;
pub use strong_marker::StrongMarker;
pub use unordered_list_marker_style::UnorderedListMarkerStyle;

use crate::rule::Rule;

type RuleCtor = fn() -> Box<dyn Rule>;

fn boxed<R: Rule + Default + 'static>() -> Box<dyn Rule> {
    Box::new(R::default())
}

const RULES: &[(&str, RuleCtor)] = &[
    ("code-block-style", boxed::<CodeBlockStyle>),
    ("emphasis-marker", boxed::<EmphasisMarker>),
    ("fenced-code-marker", boxed::<FencedCodeMarker>),
    ("heading-style", boxed::<HeadingStyleRule>),
    ("no-literal-urls", boxed::<NoLiteralUrls>),
    ("no-multiple-toplevel-headings", boxed::<NoMultipleToplevelHeadings>),
    ("ordered-list-marker-style", boxed::<OrderedListMarkerStyle>),
    ("rule-style", boxed::<RuleStyle>),
    ("strong-marker", boxed::<StrongMarker>),
    ("unordered-list-marker-style", boxed::<UnorderedListMarkerStyle>),
];

/// Returns all built-in rule instances, sorted by id
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    RULES.iter().map(|(_, ctor)| ctor()).collect()
}

/// Ids of all built-in rules
pub fn rule_ids() -> Vec<&'static str> {
    RULES.iter().map(|(id, _)| *id).collect()
}

/// Look up a built-in rule by id
pub fn rule_by_id(id: &str) -> Option<Box<dyn Rule>> {
    RULES.iter().find(|(rule_id, _)| *rule_id == id).map(|(_, ctor)| ctor())
}
