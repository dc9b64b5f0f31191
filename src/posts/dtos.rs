use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::forum::{
    BatchOutcome, BodyMode, Community, CommunityAllowList, PostEntry, SortMode,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostsQuery {
    /// Comma separated community names. Defaults to every allowed community.
    pub communities: Option<String>,
    /// Listing order: hot, new, rising, top or controversial. Defaults to hot.
    pub sort: Option<String>,
    /// Fetch each post's detail page and keep only posts with body text. Defaults to true.
    pub body: Option<bool>,
}

/// A validated posts request.
#[derive(Debug, PartialEq, Eq)]
pub struct PostsRequest {
    pub communities: Vec<Community>,
    pub sort: SortMode,
    pub mode: BodyMode,
}

impl PostsQuery {
    pub fn validate(&self, allowed: &CommunityAllowList) -> Result<PostsRequest, String> {
        let communities = match self.communities.as_deref().map(str::trim) {
            None | Some("") => allowed.to_vec(),
            Some(raw) => {
                let mut resolved: Vec<Community> = Vec::new();
                for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                    let community = allowed.resolve(name).map_err(|e| e.to_string())?;
                    if !resolved.contains(&community) {
                        resolved.push(community);
                    }
                }
                resolved
            }
        };
        if communities.is_empty() {
            return Err("no communities requested".to_string());
        }

        let sort = match self.sort.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortMode::default(),
        };

        Ok(PostsRequest {
            communities,
            sort,
            mode: BodyMode::from_flag(self.body.unwrap_or(true)),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResult {
    pub community: String,
    pub title: String,
    pub url: String,
    pub flair: String,
    pub body: Option<String>,
}

impl PostResult {
    fn new(community: &Community, post: PostEntry) -> Self {
        Self {
            community: community.to_string(),
            title: post.title,
            url: post.url.into(),
            flair: post.flair,
            body: post.body,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FailedCommunity {
    pub community: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostsResponse {
    pub status: String,
    pub results: Vec<PostResult>,
    pub failed: Vec<FailedCommunity>,
}

impl From<BatchOutcome> for PostsResponse {
    fn from(outcome: BatchOutcome) -> Self {
        let results = outcome
            .communities
            .into_iter()
            .flat_map(|batch| {
                let community = batch.community;
                batch
                    .posts
                    .into_iter()
                    .map(move |post| PostResult::new(&community, post))
            })
            .collect();

        let failed = outcome
            .failures
            .into_iter()
            .map(|failure| FailedCommunity {
                community: failure.community.to_string(),
                error: failure.error.to_string(),
            })
            .collect();

        Self {
            status: "ok".to_string(),
            results,
            failed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
