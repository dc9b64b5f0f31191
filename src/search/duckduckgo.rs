//! Web search through DuckDuckGo's HTML endpoint. No API key is involved.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::fetcher::HttpFetcher;
use crate::search::{MAX_RESULTS, SearchError, SearchHit, WebSearch};

static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.result__a").unwrap());

/// Query parameter of the redirect wrapper that carries the real target.
const REDIRECT_PARAM: &str = "uddg";

pub struct DuckDuckGoSearch {
    fetcher: HttpFetcher,
    endpoint: Url,
}

impl DuckDuckGoSearch {
    pub fn new(fetcher: HttpFetcher, endpoint: Url) -> Self {
        Self { fetcher, endpoint }
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let page = self
            .fetcher
            .fetch_html_with_query(&self.endpoint, &[("q", query)])
            .await?;

        let hits = parse_results(&page.body, &page.url_final);
        debug!(hits = hits.len(), "search finished");
        Ok(hits)
    }
}

/// Pull result links out of a results page, unwrapping redirect URLs.
pub fn parse_results(html: &str, page_url: &Url) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let mut hits: Vec<SearchHit> = Vec::new();

    for link in document.select(&RESULT_LINK) {
        if hits.len() >= MAX_RESULTS {
            break;
        }

        let title = link.text().collect::<String>().trim().to_string();
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_result_url(href, page_url) else {
            continue;
        };
        if title.is_empty() || hits.iter().any(|hit| hit.url == url) {
            continue;
        }

        hits.push(SearchHit { title, url });
    }

    hits
}

/// Resolve a result href to its real target.
///
/// Results are usually wrapped as `//duckduckgo.com/l/?uddg=<percent-encoded>&rut=...`;
/// plain absolute links are returned as-is. Only http(s) targets are accepted.
pub fn resolve_result_url(href: &str, page_url: &Url) -> Option<Url> {
    let url = page_url.join(href).ok()?;

    let wrapped = url
        .query_pairs()
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, target)| target.into_owned());

    let target = match wrapped {
        Some(target) => Url::parse(&target).ok()?,
        None => url,
    };

    matches!(target.scheme(), "http" | "https").then_some(target)
}
