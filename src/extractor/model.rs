use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

static SPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Readable text pulled from an arbitrary web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    pub url: Url,
    pub text: String,
}

pub fn normalize_whitespace(text: &str) -> String {
    let text = text.trim();
    let spaced = SPACE_REGEX.replace_all(text, " ");
    NEWLINE_REGEX.replace_all(&spaced, "\n\n").to_string()
}
