pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoSearch;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::fetcher::FetchError;

/// Maximum number of hits any search returns.
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: Url,
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Fetch(#[from] FetchError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Run a single query and return at most [`MAX_RESULTS`] hits.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}
