use std::fmt::{Display, Formatter};

use serde::Serialize;
use url::Url;

/// Flair reported for entries that carry no flair label.
pub const NO_FLAIR: &str = "No Flair";

/// Permalinks to posts inside a community all start with this prefix; anything
/// else (profiles, promoted links, external redirects) is not a post.
pub const POST_PATH_PREFIX: &str = "/r/";

/// A scraped post. Built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    pub title: String,
    pub url: Url,
    pub flair: String,
    /// Primary post text, present only when the detail page was fetched.
    pub body: Option<String>,
}

/// The title anchor of a listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLink {
    pub text: String,
    pub href: Option<String>,
}

/// Structured view of one listing entry. Every lookup that may miss is an `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFragment {
    pub title_link: Option<TitleLink>,
    pub flair: Option<String>,
}

/// Whether the detail page is fetched and its body required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Listing data only; `body` stays unset.
    Skip,
    /// Fetch the detail page and drop entries without a non-empty body.
    Required,
}

impl BodyMode {
    pub fn from_flag(fetch_body: bool) -> Self {
        if fetch_body {
            BodyMode::Required
        } else {
            BodyMode::Skip
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Post(PostEntry),
    Skip(SkipReason),
}

impl Extracted {
    pub fn into_post(self) -> Option<PostEntry> {
        match self {
            Extracted::Post(post) => Some(post),
            Extracted::Skip(_) => None,
        }
    }
}

/// Why a fragment was left out of the results. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingTitle,
    ForeignLink,
    DetailUnavailable,
    MissingContainer,
    MissingBody,
    EmptyBody,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingTitle => "no title link",
            SkipReason::ForeignLink => "link is not a post permalink",
            SkipReason::DetailUnavailable => "detail page could not be fetched",
            SkipReason::MissingContainer => "detail page has no post container",
            SkipReason::MissingBody => "post container has no body text",
            SkipReason::EmptyBody => "post body is empty",
        }
    }
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply the listing-level filters to a fragment: it needs a non-empty title and an
/// internal post permalink. The returned entry has no body yet.
pub fn listing_entry(fragment: &RawFragment, origin: &Url) -> Result<PostEntry, SkipReason> {
    let link = fragment
        .title_link
        .as_ref()
        .ok_or(SkipReason::MissingTitle)?;

    let href = link
        .href
        .as_deref()
        .filter(|href| href.starts_with(POST_PATH_PREFIX))
        .ok_or(SkipReason::ForeignLink)?;

    let title = link.text.trim();
    if title.is_empty() {
        return Err(SkipReason::MissingTitle);
    }

    let url = origin.join(href).map_err(|_| SkipReason::ForeignLink)?;

    let flair = fragment
        .flair
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(NO_FLAIR)
        .to_string();

    Ok(PostEntry {
        title: title.to_string(),
        url,
        flair,
        body: None,
    })
}
