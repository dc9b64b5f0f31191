pub mod model;
pub mod paragraphs;

pub use model::{PageText, normalize_whitespace};

use tracing::{debug, instrument};
use url::Url;

use crate::fetcher::HttpFetcher;

/// Fetch an arbitrary page and return the text of its paragraphs.
///
/// Best-effort: fetch failures, non-HTML responses and pages without paragraph
/// text all come back as `None`.
#[instrument(skip(fetcher), fields(url = %url))]
pub async fn extract_page_text(fetcher: &HttpFetcher, url: &Url) -> Option<PageText> {
    let page = match fetcher.fetch_html(url).await {
        Ok(page) => page,
        Err(error) => {
            debug!(%error, "page fetch failed");
            return None;
        }
    };

    let text = paragraphs::paragraph_text(&page.body)?;
    Some(PageText {
        url: page.url_final,
        text,
    })
}
