//! Chat front-end: turns commands into replies.
//!
//! The dispatcher knows nothing about the chat transport. Every failure below
//! it is logged and converted into a user-facing message here, so `handle`
//! always produces a reply.

pub mod command;
pub mod reply;
pub mod selection;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use reply::{Button, Embed, EmbedField, Reply};
pub use selection::SelectionStore;

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::extractor::{PageText, extract_page_text};
use crate::fetcher::HttpFetcher;
use crate::forum::{
    BodyMode, CommunityAllowList, FailurePolicy, ForumScraper, PostEntry, SortMode,
};
use crate::search::{SearchHit, WebSearch};
use crate::summarize::{Summarizer, SummaryPrompt};

use reply::{COLOR_BLUE, COLOR_GREEN};
use selection::{parse_summarize_custom_id, summarize_custom_id};

/// The listing command shows what is gaining traction, not what is already hot.
const LATEST_SORT: SortMode = SortMode::Rising;

const MSG_COMMAND_FAILED: &str = "❌ An error occurred while processing the command.";
const MSG_FETCH_FAILED: &str = "❌ Failed to fetch data from the subreddit.";
const MSG_NO_POSTS: &str = "❌ No posts found in the subreddit.";
const MSG_SUMMARY_FAILED: &str = "❌ Failed to generate AI summary for this post.";
const MSG_SELECTION_EXPIRED: &str =
    "⌛ This selection has expired. Run /latest again to pick a post.";
const MSG_UNKNOWN_ACTION: &str = "❌ Unknown action.";
const MSG_EMPTY_QUESTION: &str = "❌ Please provide a question.";
const MSG_SEARCH_FAILED: &str = "❌ Could not complete the search. Please try again later.";
const MSG_NO_RESULTS: &str = "❌ No search results found.";
const MSG_NO_READABLE_SOURCES: &str = "❌ Could not read any of the search results.";
const MSG_ANSWER_FAILED: &str = "❌ Could not generate an answer. Please try again later.";

pub struct Bot {
    scraper: ForumScraper,
    fetcher: HttpFetcher,
    communities: CommunityAllowList,
    search: Arc<dyn WebSearch>,
    summarizer: Arc<dyn Summarizer>,
    selections: SelectionStore,
}

impl Bot {
    pub fn new(
        scraper: ForumScraper,
        fetcher: HttpFetcher,
        communities: CommunityAllowList,
        search: Arc<dyn WebSearch>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            scraper,
            fetcher,
            communities,
            search,
            summarizer,
            selections: SelectionStore::new(),
        }
    }

    /// Replace the selection store, e.g. to shorten its lifetime.
    pub fn with_selections(mut self, selections: SelectionStore) -> Self {
        self.selections = selections;
        self
    }

    pub fn communities(&self) -> &CommunityAllowList {
        &self.communities
    }

    pub async fn handle(&self, command: Command) -> Reply {
        match command {
            Command::Ping => self.ping().await,
            Command::Latest { community } => self.latest(&community).await,
            Command::Ask { question } => self.ask(&question).await,
            Command::Interaction { custom_id } => self.interaction(&custom_id).await,
        }
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Reply {
        match self.fetcher.round_trip(self.scraper.origin()).await {
            Ok(latency) => Reply::text(format!("🏓 Pong! Latency: {}ms", latency.as_millis())),
            Err(error) => {
                error!(%error, "latency check failed");
                Reply::text(MSG_COMMAND_FAILED)
            }
        }
    }

    #[instrument(skip(self))]
    async fn latest(&self, name: &str) -> Reply {
        let community = match self.communities.resolve(name) {
            Ok(community) => community,
            Err(_) => {
                let choices: Vec<&str> = self.communities.iter().map(|c| c.as_str()).collect();
                return Reply::text(format!(
                    "❌ Unknown subreddit '{}'. Choose one of: {}",
                    name.trim(),
                    choices.join(", ")
                ));
            }
        };

        let outcome = self
            .scraper
            .scrape_batch(
                std::slice::from_ref(&community),
                LATEST_SORT,
                BodyMode::Skip,
                FailurePolicy::Abort,
            )
            .await;

        let posts = match outcome {
            Ok(outcome) => outcome
                .communities
                .into_iter()
                .flat_map(|c| c.posts)
                .collect::<Vec<_>>(),
            Err(error) => {
                warn!(%error, "latest command failed");
                return Reply::text(MSG_FETCH_FAILED);
            }
        };

        if posts.is_empty() {
            return Reply::text(MSG_NO_POSTS);
        }

        info!(posts = posts.len(), "rendering listing");
        self.render_listing(community.as_str(), posts)
    }

    fn render_listing(&self, community: &str, posts: Vec<PostEntry>) -> Reply {
        let mut embed = Embed::new(format!("📬 Latest posts from r/{}", community), COLOR_BLUE);
        let mut buttons = Vec::with_capacity(posts.len());

        for (i, post) in posts.into_iter().enumerate() {
            embed = embed.field(
                format!("{}. {}", i + 1, post.title),
                format!("**Flair:** {}\n🔗 [Link]({})", post.flair, post.url),
                false,
            );
            let id = self.selections.insert(post);
            buttons.push(Button {
                label: (i + 1).to_string(),
                custom_id: summarize_custom_id(&id),
            });
        }

        Reply::embed(embed).with_buttons(buttons)
    }

    #[instrument(skip(self))]
    async fn interaction(&self, custom_id: &str) -> Reply {
        let Some(id) = parse_summarize_custom_id(custom_id) else {
            return Reply::ephemeral(MSG_UNKNOWN_ACTION);
        };
        let Some(post) = self.selections.resolve(&id) else {
            return Reply::ephemeral(MSG_SELECTION_EXPIRED);
        };

        match self.summarizer.summarize(&SummaryPrompt::for_post(&post)).await {
            Ok(summary) => {
                Reply::ephemeral(format!("🧠 AI Summary: \n{}\nURL: {}", summary, post.url))
            }
            Err(error) => {
                error!(%error, url = %post.url, "post summary failed");
                Reply::ephemeral(MSG_SUMMARY_FAILED)
            }
        }
    }

    #[instrument(skip(self))]
    async fn ask(&self, question: &str) -> Reply {
        let question = question.trim();
        if question.is_empty() {
            return Reply::text(MSG_EMPTY_QUESTION);
        }

        let hits = match self.search.search(question).await {
            Ok(hits) => hits,
            Err(error) => {
                error!(%error, "search failed");
                return Reply::text(MSG_SEARCH_FAILED);
            }
        };
        if hits.is_empty() {
            return Reply::text(MSG_NO_RESULTS);
        }

        let sources = self.read_sources(&hits).await;
        if sources.is_empty() {
            return Reply::text(MSG_NO_READABLE_SOURCES);
        }

        let combined = combine_sources(&sources);
        let answer = match self
            .summarizer
            .summarize(&SummaryPrompt::for_answer(question, &combined))
            .await
        {
            Ok(answer) => answer,
            Err(error) => {
                error!(%error, "answer summary failed");
                return Reply::text(MSG_ANSWER_FAILED);
            }
        };

        let links = sources
            .iter()
            .enumerate()
            .fold(String::new(), |mut links, (i, (hit, _))| {
                let _ = writeln!(links, "{}. [{}]({})", i + 1, hit.title, hit.url);
                links
            });

        Reply::embed(
            Embed::new(format!("🔎 {}", question), COLOR_GREEN)
                .description(answer)
                .field("Sources", links.trim_end(), false),
        )
    }

    /// Fetch the text of every hit in order, keeping the ones that produced any.
    async fn read_sources<'a>(&self, hits: &'a [SearchHit]) -> Vec<(&'a SearchHit, PageText)> {
        let mut sources = Vec::with_capacity(hits.len());
        for hit in hits {
            if let Some(text) = extract_page_text(&self.fetcher, &hit.url).await {
                sources.push((hit, text));
            }
        }
        sources
    }
}

fn combine_sources(sources: &[(&SearchHit, PageText)]) -> String {
    sources
        .iter()
        .fold(String::new(), |mut combined, (hit, page)| {
            let _ = write!(combined, "Source: {} ({})\n{}\n\n", hit.title, hit.url, page.text);
            combined
        })
}
