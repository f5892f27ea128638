//! Stylesheet validation for override CSS.

use std::sync::LazyLock;

use regex::Regex;

/// Parse `css` with lightningcss, returning the parser's message on failure.
pub fn validate_css(css: &str) -> Result<(), String> {
    use lightningcss::stylesheet::{ParserOptions, StyleSheet};

    StyleSheet::parse(css, ParserOptions::default())
        .map(|_| ())
        .map_err(|e| format!("CSS parse error: {}", e))
}

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("Invalid style element regex")
});

/// Bodies of every `<style>` element in an HTML snippet.
pub fn inline_styles(html: &str) -> Vec<&str> {
    STYLE_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}
