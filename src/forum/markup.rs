//! Structural lookups on forum markup.
//!
//! The listing and detail pages are old-style forum HTML whose structure is only
//! loosely consistent, so every lookup here returns an `Option` (or a
//! [`SkipReason`]) instead of assuming an element is present. Parsed documents
//! never leave this module: callers get owned values back, which keeps the
//! async fetch loop free of non-`Send` DOM handles.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::forum::post::{RawFragment, SkipReason, TitleLink};

struct ListingSelectors {
    entry: Selector,
    title_link: Selector,
    flair: Selector,
}

struct PostSelectors {
    container: Selector,
    body: Selector,
}

static LISTING: LazyLock<ListingSelectors> = LazyLock::new(|| ListingSelectors {
    entry: Selector::parse("div.thing").unwrap(),
    title_link: Selector::parse("a.title").unwrap(),
    flair: Selector::parse("span.linkflairlabel").unwrap(),
});

// Comment bodies share the `usertext-body` class but live outside `#siteTable`.
static POST: LazyLock<PostSelectors> = LazyLock::new(|| PostSelectors {
    container: Selector::parse("#siteTable").unwrap(),
    body: Selector::parse("div.usertext-body").unwrap(),
});

/// All listing entries on a listing page, in document order.
pub fn parse_listing(html: &str) -> Vec<RawFragment> {
    let document = Html::parse_document(html);
    document
        .select(&LISTING.entry)
        .map(|entry| RawFragment {
            title_link: first(entry, &LISTING.title_link).map(|link| TitleLink {
                text: element_text(link),
                href: link.value().attr("href").map(str::to_string),
            }),
            flair: first(entry, &LISTING.flair).map(element_text),
        })
        .collect()
}

/// The primary body text of a post detail page.
pub fn parse_post_body(html: &str) -> Result<String, SkipReason> {
    let document = Html::parse_document(html);
    let container = document
        .select(&POST.container)
        .next()
        .ok_or(SkipReason::MissingContainer)?;

    let body = first(container, &POST.body).ok_or(SkipReason::MissingBody)?;
    let text = element_text(body);
    if text.is_empty() {
        return Err(SkipReason::EmptyBody);
    }
    Ok(text)
}

fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
