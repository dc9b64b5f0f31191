use crate::fetcher::types::PageResponse;
use chrono::Utc;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

const SNIFF_WINDOW: usize = 4096;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: &[u8],
    content_type: &str,
) -> PageResponse {
    let encoding = detect_encoding(content_type, body_bytes);
    // Forum markup occasionally carries stray bytes; a lossy decode keeps the page usable.
    let (decoded, _, _) = encoding.decode(body_bytes);

    PageResponse {
        url_final,
        status,
        body: decoded.into_owned(),
        fetched_at: Utc::now(),
    }
}

fn detect_encoding(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_from(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_WINDOW)];
    let search_str = String::from_utf8_lossy(search_bytes);
    if let Some(encoding) = label_from(&META_CHARSET_REGEX, &search_str) {
        return encoding;
    }

    if std::str::from_utf8(body_bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    detector.guess(None, true)
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
