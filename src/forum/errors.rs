use thiserror::Error;

use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("failed to fetch listing for r/{community}: {source}")]
    FetchFailed {
        community: String,
        #[source]
        source: FetchError,
    },

    #[error("unknown community: {0}")]
    UnknownCommunity(String),
}

impl ScrapeError {
    /// The community the failure refers to.
    pub fn community(&self) -> &str {
        match self {
            Self::FetchFailed { community, .. } => community,
            Self::UnknownCommunity(community) => community,
        }
    }
}
