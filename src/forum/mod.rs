//! Forum scraping: listing fetch, post extraction and per-community batching.

pub mod community;
pub mod errors;
pub mod markup;
pub mod post;
pub mod scraper;

#[cfg(all(test, feature = "fuzz"))]
mod tests;

pub use community::{Community, CommunityAllowList, SortMode};
pub use errors::ScrapeError;
pub use post::{BodyMode, Extracted, NO_FLAIR, PostEntry, RawFragment, SkipReason, TitleLink};
pub use scraper::{
    BatchOutcome, CommunityFailure, CommunityPosts, FailurePolicy, ForumScraper, ScraperSettings,
};
