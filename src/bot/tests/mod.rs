use std::sync::Arc;
use std::time::Duration;

use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::bot::{Bot, Command, Reply, SelectionStore};
use crate::fetcher::{FetchError, HttpFetcher};
use crate::forum::{CommunityAllowList, ForumScraper, NO_FLAIR, ScraperSettings};
use crate::search::{MockWebSearch, SearchError, SearchHit};
use crate::summarize::{MockSummarizer, SummarizeError};

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(body.into_bytes())
        .insert_header("Content-Type", "text/html; charset=utf-8")
}

fn listing(entries: &[(&str, &str, Option<&str>)]) -> String {
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
    format!(r#"<html><body><div id="siteTable">{}</div></body></html>"#, things)
}

fn bot(server: &MockServer, search: MockWebSearch, summarizer: MockSummarizer) -> Bot {
    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let scraper = ForumScraper::new(
        fetcher.clone(),
        ScraperSettings {
            origin: Url::parse(&server.uri()).unwrap(),
            post_cap: 5,
            detail_fetch_delay: Duration::ZERO,
        },
    );
    Bot::new(
        scraper,
        fetcher,
        CommunityAllowList::parse("privacy,hacking,netsec,scams").unwrap(),
        Arc::new(search),
        Arc::new(summarizer),
    )
}

fn content(reply: &Reply) -> &str {
    reply.content.as_deref().unwrap_or_default()
}

async fn latest(bot: &Bot, community: &str) -> Reply {
    bot.handle(Command::Latest {
        community: community.to_string(),
    })
    .await
}

#[tokio::test]
async fn latest_renders_rising_posts_with_buttons() {
    let server = MockServer::start().await;
    let entries: Vec<(String, String)> = (1..=7)
        .map(|i| (format!("Post {}", i), format!("/r/scams/comments/{}/post/", i)))
        .collect();
    let mut listed: Vec<(&str, &str, Option<&str>)> =
        vec![("Sponsored", "https://ads.example.com/", None)];
    listed.extend(
        entries
            .iter()
            .map(|(t, h)| (t.as_str(), h.as_str(), Some("Scam Report"))),
    );
    listed[2].2 = None;

    Mock::given(method("GET"))
        .and(path("/r/scams/rising/"))
        .respond_with(html(listing(&listed)))
        .expect(1)
        .mount(&server)
        .await;

    let bot = bot(&server, MockWebSearch::new(), MockSummarizer::new());
    let reply = latest(&bot, "Scams").await;

    let embed = reply.embed.as_ref().expect("listing embed");
    assert_eq!(embed.title, "📬 Latest posts from r/scams");
    assert_eq!(embed.fields.len(), 5);
    assert_eq!(embed.fields[0].name, "1. Post 1");
    assert_eq!(
        embed.fields[0].value,
        format!(
            "**Flair:** Scam Report\n🔗 [Link]({}/r/scams/comments/1/post/)",
            server.uri()
        )
    );
    assert!(embed.fields[1].value.contains(NO_FLAIR));
    assert_eq!(embed.fields[4].name, "5. Post 5");

    let labels: Vec<&str> = reply.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["1", "2", "3", "4", "5"]);
    assert!(reply.buttons.iter().all(|b| b.custom_id.starts_with("summarize:")));
    assert!(!reply.ephemeral);
}

#[tokio::test]
async fn latest_rejects_communities_outside_allow_list() {
    let server = MockServer::start().await;
    let bot = bot(&server, MockWebSearch::new(), MockSummarizer::new());

    let reply = latest(&bot, "socialengineering").await;
    assert!(content(&reply).starts_with("❌ Unknown subreddit 'socialengineering'"));
    assert!(content(&reply).contains("privacy, hacking, netsec, scams"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn latest_reports_listing_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/scams/rising/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let bot = bot(&server, MockWebSearch::new(), MockSummarizer::new());
    let reply = latest(&bot, "scams").await;
    assert_eq!(content(&reply), "❌ Failed to fetch data from the subreddit.");
}

#[tokio::test]
async fn latest_reports_empty_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/privacy/rising/"))
        .respond_with(html(listing(&[("Profile", "/user/someone", None)])))
        .mount(&server)
        .await;

    let bot = bot(&server, MockWebSearch::new(), MockSummarizer::new());
    let reply = latest(&bot, "privacy").await;
    assert_eq!(content(&reply), "❌ No posts found in the subreddit.");
    assert!(reply.buttons.is_empty());
}

#[tokio::test]
async fn pressing_a_button_summarizes_that_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/hacking/rising/"))
        .respond_with(html(listing(&[
            ("First", "/r/hacking/comments/1/first/", None),
            ("Second", "/r/hacking/comments/2/second/", Some("Question")),
        ])))
        .mount(&server)
        .await;

    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .withf(|prompt| {
            prompt.user.contains("/r/hacking/comments/2/second/") && prompt.user.contains("Second")
        })
        .times(1)
        .returning(|_| Ok("Someone asked about lock picking.".to_string()));

    let bot = bot(&server, MockWebSearch::new(), summarizer);
    let listing = latest(&bot, "hacking").await;
    let second = listing.buttons[1].custom_id.clone();

    let reply = bot.handle(Command::Interaction { custom_id: second }).await;
    assert!(reply.ephemeral);
    assert_eq!(
        content(&reply),
        format!(
            "🧠 AI Summary: \nSomeone asked about lock picking.\nURL: {}/r/hacking/comments/2/second/",
            server.uri()
        )
    );
}

#[tokio::test]
async fn expired_or_unknown_buttons_do_not_reach_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/netsec/rising/"))
        .respond_with(html(listing(&[("Writeup", "/r/netsec/comments/1/w/", None)])))
        .mount(&server)
        .await;

    // No expectations: any summarize call would panic.
    let bot = bot(&server, MockWebSearch::new(), MockSummarizer::new())
        .with_selections(SelectionStore::with_ttl(Duration::ZERO));
    let listing = latest(&bot, "netsec").await;
    let custom_id = listing.buttons[0].custom_id.clone();

    let expired = bot.handle(Command::Interaction { custom_id }).await;
    assert!(expired.ephemeral);
    assert!(content(&expired).starts_with("⌛ This selection has expired."));

    let unknown = bot
        .handle(Command::Interaction {
            custom_id: "vote:up".to_string(),
        })
        .await;
    assert_eq!(content(&unknown), "❌ Unknown action.");
}

#[tokio::test]
async fn summary_failure_is_reported_to_the_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/privacy/rising/"))
        .respond_with(html(listing(&[("Tracker", "/r/privacy/comments/1/t/", None)])))
        .mount(&server)
        .await;

    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .times(1)
        .returning(|_| Err(SummarizeError::EmptyResponse));

    let bot = bot(&server, MockWebSearch::new(), summarizer);
    let listing = latest(&bot, "privacy").await;
    let custom_id = listing.buttons[0].custom_id.clone();

    let reply = bot.handle(Command::Interaction { custom_id }).await;
    assert!(reply.ephemeral);
    assert_eq!(content(&reply), "❌ Failed to generate AI summary for this post.");
}

#[tokio::test]
async fn ask_summarizes_readable_sources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html(
            "<html><body><p>Never share one-time codes.</p><p>Banks will not ask for them.</p></body></html>"
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let guide = Url::parse(&format!("{}/guide", server.uri())).unwrap();
    let gone = Url::parse(&format!("{}/gone", server.uri())).unwrap();

    let mut search = MockWebSearch::new();
    let hits = vec![
        SearchHit {
            title: "Dead link".to_string(),
            url: gone,
        },
        SearchHit {
            title: "OTP guide".to_string(),
            url: guide.clone(),
        },
    ];
    search
        .expect_search()
        .withf(|query| query.to_string() == "is sharing my otp safe?")
        .times(1)
        .returning(move |_| Ok(hits.clone()));

    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .withf(|prompt| {
            prompt.user.contains("Question: is sharing my otp safe?")
                && prompt.user.contains("Never share one-time codes.\nBanks will not ask for them.")
                && !prompt.user.contains("Dead link")
        })
        .times(1)
        .returning(|_| Ok("No. Keep one-time codes to yourself.".to_string()));

    let bot = bot(&server, search, summarizer);
    let reply = bot
        .handle(Command::Ask {
            question: "  is sharing my otp safe?  ".to_string(),
        })
        .await;

    let embed = reply.embed.as_ref().expect("answer embed");
    assert_eq!(embed.title, "🔎 is sharing my otp safe?");
    assert_eq!(
        embed.description.as_deref(),
        Some("No. Keep one-time codes to yourself.")
    );
    assert_eq!(embed.fields.len(), 1);
    assert_eq!(embed.fields[0].name, "Sources");
    assert_eq!(embed.fields[0].value, format!("1. [OTP guide]({})", guide));
}

#[tokio::test]
async fn ask_handles_search_failures_and_empty_results() {
    let server = MockServer::start().await;

    let mut failing = MockWebSearch::new();
    failing
        .expect_search()
        .returning(|_| Err(SearchError::Fetch(FetchError::RequestTimeout)));
    let bot_failing = bot(&server, failing, MockSummarizer::new());
    let reply = bot_failing
        .handle(Command::Ask {
            question: "anything".to_string(),
        })
        .await;
    assert_eq!(
        content(&reply),
        "❌ Could not complete the search. Please try again later."
    );

    let mut empty = MockWebSearch::new();
    empty.expect_search().returning(|_| Ok(Vec::new()));
    let bot_empty = bot(&server, empty, MockSummarizer::new());
    let reply = bot_empty
        .handle(Command::Ask {
            question: "anything".to_string(),
        })
        .await;
    assert_eq!(content(&reply), "❌ No search results found.");
}

#[tokio::test]
async fn ask_without_readable_sources_skips_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(html("<html><body><div>no paragraphs</div></body></html>".to_string()))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/empty", server.uri())).unwrap();
    let mut search = MockWebSearch::new();
    search.expect_search().returning(move |_| {
        Ok(vec![SearchHit {
            title: "Empty".to_string(),
            url: url.clone(),
        }])
    });

    let bot = bot(&server, search, MockSummarizer::new());
    let reply = bot
        .handle(Command::Ask {
            question: "what now".to_string(),
        })
        .await;
    assert_eq!(content(&reply), "❌ Could not read any of the search results.");
}

#[tokio::test]
async fn ping_reports_latency() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let bot = bot(&server, MockWebSearch::new(), MockSummarizer::new());
    let reply = bot.handle(Command::Ping).await;
    assert!(content(&reply).starts_with("🏓 Pong! Latency: "));
    assert!(content(&reply).ends_with("ms"));
}
