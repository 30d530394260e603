mod code_block_test;
mod heading_style_test;
mod list_marker_test;
mod marker_rules_test;
mod no_literal_urls_test;
