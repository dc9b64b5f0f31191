use crate::forum::{CommunityAllowList, ForumScraper};

#[derive(Clone)]
pub struct AppState {
    pub scraper: ForumScraper,
    pub communities: CommunityAllowList,
}

impl AppState {
    pub fn new(scraper: ForumScraper, communities: CommunityAllowList) -> Self {
        Self {
            scraper,
            communities,
        }
    }
}
