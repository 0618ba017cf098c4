//! Four-letter personality code extraction from free-form model output.

use regex::Regex;
use std::sync::OnceLock;

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[IE][NS][TF][JP]").expect("valid personality regex"))
}

/// Returns the first `[IE][NS][TF][JP]` substring of `text`, if any.
pub fn extract_personality_code(text: &str) -> Option<&str> {
    code_pattern().find(text).map(|m| m.as_str())
}
