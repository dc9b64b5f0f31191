use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};
use reqwest::{Client, ClientBuilder, header};
use std::time::{Duration, Instant};
use tracing::instrument;
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Listing pages reject obvious bot agents, so requests present as a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Shared HTML fetcher. Built once at startup and handed to every component that
/// talks HTTP; cloning is cheap because `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    ),
                );
                headers
            })
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// The underlying client, for collaborators that speak JSON rather than HTML.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET an HTML page. Any non-2xx status is an error; there are no retries.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_html(&self, url: &Url) -> Result<PageResponse, FetchError> {
        self.fetch_html_with_query(url, &[]).await
    }

    #[instrument(skip(self, query), fields(url = %url))]
    pub async fn fetch_html_with_query(
        &self,
        url: &Url,
        query: &[(&str, &str)],
    ) -> Result<PageResponse, FetchError> {
        let mut request = self.client.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        Ok(process_response(final_url, status, &body_bytes, &content_type))
    }

    /// Round-trip time of a bare GET against `url`, regardless of the response status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn round_trip(&self, url: &Url) -> Result<Duration, FetchError> {
        let started = Instant::now();
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;
        Ok(started.elapsed())
    }
}
