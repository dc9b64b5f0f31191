#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use url::Url;
use wiremock::{MockServer, ResponseTemplate};

use wraithwatch::{
    app_state::AppState,
    fetcher::HttpFetcher,
    forum::{CommunityAllowList, ForumScraper, ScraperSettings},
    server,
};

pub const COMMUNITIES: &str = "privacy,hacking,netsec,scams";

pub fn html_response(body: impl AsRef<str>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(body.as_ref().as_bytes())
        .insert_header("Content-Type", "text/html; charset=utf-8")
}

/// One `div.thing` per entry: `(title, href, flair)`.
pub fn listing_html(entries: &[(&str, &str, Option<&str>)]) -> String {
    let things: String = entries
        .iter()
        .map(|(title, href, flair)| {
            let flair = flair
                .map(|f| format!(r#"<span class="linkflairlabel">{}</span>"#, f))
                .unwrap_or_default();
            format!(
                r#"<div class="thing"><p class="title"><a class="title" href="{}">{}</a>{}</p></div>"#,
                href, title, flair
            )
        })
        .collect();
    format!(
        r#"<html><body><div id="siteTable">{}</div></body></html>"#,
        things
    )
}

pub fn post_html(body: &str) -> String {
    format!(
        r#"<html><body>
            <div id="siteTable"><div class="thing"><div class="usertext-body"><p>{}</p></div></div></div>
            <div class="commentarea"><div class="usertext-body"><p>a comment</p></div></div>
        </body></html>"#,
        body
    )
}

pub fn scraper(server: &MockServer, post_cap: usize) -> ForumScraper {
    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    ForumScraper::new(
        fetcher,
        ScraperSettings {
            origin: Url::parse(&server.uri()).unwrap(),
            post_cap,
            detail_fetch_delay: Duration::ZERO,
        },
    )
}

pub fn communities() -> CommunityAllowList {
    CommunityAllowList::parse(COMMUNITIES).unwrap()
}

pub fn test_app(server: &MockServer) -> Router {
    server::router(AppState::new(scraper(server, 5), communities()))
}
