use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Shortest text that can hold a token (`{{X}}`). Anything shorter is not
/// worth a round trip to the extraction service.
pub const MIN_EXTRACT_LEN: usize = 5;

/// `{{` + non-empty run without braces + `}}`. Nested or unclosed delimiters
/// simply fail to match.
pub(crate) static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("token pattern is valid"));

/// Whether `text` is long enough to be sent for extraction.
pub fn should_extract(text: &str) -> bool {
    text.trim().chars().count() >= MIN_EXTRACT_LEN
}

/// Distinct placeholder names in order of first appearance, delimiters
/// stripped. No trimming or case folding is applied to the names.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    if !should_extract(text) {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    TOKEN_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// `name` -> `{{name}}`.
pub fn wrap_token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}
