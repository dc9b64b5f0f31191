use proptest::prelude::*;
use url::Url;

use crate::forum::markup::{parse_listing, parse_post_body};
use crate::forum::post::listing_entry;

fn listing_html(hrefs: &[String]) -> String {
    let entries: String = hrefs
        .iter()
        .enumerate()
        .map(|(i, href)| {
            format!(
                r#"<div class="thing"><a class="title" href="{}">Post {}</a></div>"#,
                href, i
            )
        })
        .collect();
    format!("<html><body><div id=\"siteTable\">{}</div></body></html>", entries)
}

proptest! {
    #[test]
    fn parsers_never_panic(html in ".*") {
        let _ = parse_listing(&html);
        let _ = parse_post_body(&html);
    }

    #[test]
    fn listing_filter_keeps_only_permalinks_in_order(
        hrefs in proptest::collection::vec("(/r/[a-z]{1,8}/comments/[a-z0-9]{1,6}/|https://[a-z]{1,8}\\.com/|/user/[a-z]{1,8})", 0..12),
        cap in 1usize..8,
    ) {
        let origin = Url::parse("https://old.reddit.com").unwrap();
        let fragments = parse_listing(&listing_html(&hrefs));
        prop_assert_eq!(fragments.len(), hrefs.len());

        let kept: Vec<String> = fragments
            .iter()
            .filter_map(|f| listing_entry(f, &origin).ok())
            .take(cap)
            .map(|entry| entry.url.path().to_string())
            .collect();

        let expected: Vec<String> = hrefs
            .iter()
            .filter(|h| h.starts_with("/r/"))
            .take(cap)
            .cloned()
            .collect();

        prop_assert!(kept.len() <= cap);
        prop_assert_eq!(kept, expected);
    }
}
