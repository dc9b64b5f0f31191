use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use wraithwatch::{
    bot::{Bot, Button, Command, Reply},
    config::Config,
    fetcher::HttpFetcher,
    forum::ForumScraper,
    search::DuckDuckGoSearch,
    summarize::GroqSummarizer,
    telemetry,
};

const HELP: &str = "commands: /ping, /latest <subreddit>, /ask <question>, /press <label>, /quit";

/// Console adapter: reads slash commands from stdin and prints replies. `/press`
/// replays a button from the most recent reply that carried buttons.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env()?;
    // Checked up front so a misconfigured bot fails at startup rather than per command.
    config.bot_token()?;
    let llm = config.llm_settings()?;

    let fetcher = HttpFetcher::new(config.http_timeout())?;
    let scraper = ForumScraper::new(fetcher.clone(), config.scraper_settings());
    let search = Arc::new(DuckDuckGoSearch::new(
        fetcher.clone(),
        config.search_endpoint().clone(),
    ));
    let summarizer = Arc::new(GroqSummarizer::new(fetcher.client().clone(), llm));
    let bot = Bot::new(
        scraper,
        fetcher,
        config.communities().clone(),
        search,
        summarizer,
    );

    info!(
        communities = bot.communities().iter().count(),
        "bot ready"
    );
    println!("{HELP}");

    let mut buttons: Vec<Button> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        let command = match line.strip_prefix("/press") {
            Some(label) => match press(&buttons, label.trim()) {
                Some(command) => command,
                None => {
                    println!("no button labelled '{}'", label.trim());
                    continue;
                }
            },
            None => match line.parse::<Command>() {
                Ok(command) => command,
                Err(error) => {
                    warn!(%error, "unparseable command");
                    println!("{error}\n{HELP}");
                    continue;
                }
            },
        };

        let reply = bot.handle(command).await;
        print_reply(&reply);
        if !reply.buttons.is_empty() {
            buttons = reply.buttons;
        }
    }

    Ok(())
}

/// Match a button by label, or by its 1-based position.
fn press(buttons: &[Button], label: &str) -> Option<Command> {
    let by_index = label
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| buttons.get(i));
    by_index
        .or_else(|| buttons.iter().find(|b| b.label.eq_ignore_ascii_case(label)))
        .map(|button| Command::Interaction {
            custom_id: button.custom_id.clone(),
        })
}

fn print_reply(reply: &Reply) {
    if reply.ephemeral {
        println!("(only you can see this)");
    }
    println!("{reply}");
}
