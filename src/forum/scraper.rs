use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::fetcher::HttpFetcher;
use crate::forum::{
    community::{Community, SortMode},
    errors::ScrapeError,
    markup,
    post::{BodyMode, Extracted, PostEntry, RawFragment, SkipReason, listing_entry},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperSettings {
    /// Scheme and host of the forum; relative permalinks are joined onto it.
    pub origin: Url,
    /// Maximum number of entries kept per community.
    pub post_cap: usize,
    /// Pause between consecutive detail-page fetches.
    pub detail_fetch_delay: Duration,
}

/// What to do when a community's listing cannot be fetched during a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Fail the whole batch on the first listing failure.
    Abort,
    /// Record the failure and carry on with the remaining communities.
    Skip,
}

#[derive(Debug)]
pub struct CommunityPosts {
    pub community: Community,
    pub posts: Vec<PostEntry>,
}

#[derive(Debug)]
pub struct CommunityFailure {
    pub community: Community,
    pub error: ScrapeError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub communities: Vec<CommunityPosts>,
    pub failures: Vec<CommunityFailure>,
}

impl BatchOutcome {
    pub fn total_posts(&self) -> usize {
        self.communities.iter().map(|c| c.posts.len()).sum()
    }
}

/// Listing fetcher and post extractor for one forum origin.
#[derive(Debug, Clone)]
pub struct ForumScraper {
    fetcher: HttpFetcher,
    settings: ScraperSettings,
}

impl ForumScraper {
    pub fn new(fetcher: HttpFetcher, settings: ScraperSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn origin(&self) -> &Url {
        &self.settings.origin
    }

    pub fn post_cap(&self) -> usize {
        self.settings.post_cap
    }

    pub fn listing_url(&self, community: &Community, sort: SortMode) -> Result<Url, ScrapeError> {
        self.settings
            .origin
            .join(&format!("/r/{}/{}/", community, sort))
            .map_err(|e| ScrapeError::FetchFailed {
                community: community.to_string(),
                source: e.into(),
            })
    }

    /// Fetch a listing page and return its entries in listing order. A page with no
    /// entries yields an empty vector; only transport failures and non-2xx
    /// statuses are errors.
    #[instrument(skip(self), fields(community = %community, sort = %sort))]
    pub async fn fetch_listing(
        &self,
        community: &Community,
        sort: SortMode,
    ) -> Result<Vec<RawFragment>, ScrapeError> {
        let url = self.listing_url(community, sort)?;
        let page = self
            .fetcher
            .fetch_html(&url)
            .await
            .map_err(|source| ScrapeError::FetchFailed {
                community: community.to_string(),
                source,
            })?;

        let fragments = markup::parse_listing(&page.body);
        debug!(entries = fragments.len(), "parsed listing");
        Ok(fragments)
    }

    /// Turn one listing fragment into a post, or explain why it was skipped.
    pub async fn extract(&self, fragment: &RawFragment, mode: BodyMode) -> Extracted {
        let entry = match listing_entry(fragment, &self.settings.origin) {
            Ok(entry) => entry,
            Err(reason) => return Extracted::Skip(reason),
        };

        match mode {
            BodyMode::Skip => Extracted::Post(entry),
            BodyMode::Required => match self.attach_body(entry).await {
                Ok(entry) => Extracted::Post(entry),
                Err(reason) => Extracted::Skip(reason),
            },
        }
    }

    /// Scrape one community: fetch its listing, then walk the fragments in order until
    /// the cap is reached. Fragments past the cap are never looked at.
    #[instrument(skip(self), fields(community = %community, sort = %sort))]
    pub async fn collect(
        &self,
        community: &Community,
        sort: SortMode,
        mode: BodyMode,
    ) -> Result<Vec<PostEntry>, ScrapeError> {
        let fragments = self.fetch_listing(community, sort).await?;
        let mut posts = Vec::with_capacity(self.settings.post_cap);
        let mut detail_fetches = 0usize;

        for fragment in &fragments {
            if posts.len() >= self.settings.post_cap {
                break;
            }

            let entry = match listing_entry(fragment, &self.settings.origin) {
                Ok(entry) => entry,
                Err(reason) => {
                    debug!(%reason, "skipping listing entry");
                    continue;
                }
            };

            let entry = match mode {
                BodyMode::Skip => entry,
                BodyMode::Required => {
                    if detail_fetches > 0 {
                        self.pace().await;
                    }
                    detail_fetches += 1;

                    let url = entry.url.clone();
                    match self.attach_body(entry).await {
                        Ok(entry) => entry,
                        Err(reason) => {
                            debug!(%url, %reason, "skipping post");
                            continue;
                        }
                    }
                }
            };

            posts.push(entry);
        }

        info!(
            retained = posts.len(),
            scanned = fragments.len(),
            "collected posts"
        );
        Ok(posts)
    }

    /// Scrape several communities in order, applying `policy` to listing failures.
    pub async fn scrape_batch(
        &self,
        communities: &[Community],
        sort: SortMode,
        mode: BodyMode,
        policy: FailurePolicy,
    ) -> Result<BatchOutcome, ScrapeError> {
        let mut outcome = BatchOutcome::default();

        for community in communities {
            match self.collect(community, sort, mode).await {
                Ok(posts) => outcome.communities.push(CommunityPosts {
                    community: community.clone(),
                    posts,
                }),
                Err(error) => {
                    warn!(community = %community, %error, "listing fetch failed");
                    match policy {
                        FailurePolicy::Abort => return Err(error),
                        FailurePolicy::Skip => outcome.failures.push(CommunityFailure {
                            community: community.clone(),
                            error,
                        }),
                    }
                }
            }
        }

        Ok(outcome)
    }

    async fn attach_body(&self, mut entry: PostEntry) -> Result<PostEntry, SkipReason> {
        let page = self
            .fetcher
            .fetch_html(&entry.url)
            .await
            .map_err(|error| {
                debug!(url = %entry.url, %error, "detail fetch failed");
                SkipReason::DetailUnavailable
            })?;

        entry.body = Some(markup::parse_post_body(&page.body)?);
        Ok(entry)
    }

    async fn pace(&self) {
        if !self.settings.detail_fetch_delay.is_zero() {
            tokio::time::sleep(self.settings.detail_fetch_delay).await;
        }
    }
}
