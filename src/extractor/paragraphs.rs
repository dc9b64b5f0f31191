use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::extractor::model::normalize_whitespace;

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Concatenate the text of every `<p>` element, one paragraph per line.
/// Returns `None` when the page has no paragraph text at all.
pub fn paragraph_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return None;
    }
    Some(normalize_whitespace(&paragraphs.join("\n")))
}
