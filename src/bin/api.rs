use anyhow::{Context, Result};
use tracing::info;
use wraithwatch::{
    app_state::AppState, config::Config, fetcher::HttpFetcher, forum::ForumScraper, server,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let fetcher = HttpFetcher::new(config.http_timeout())?;
    let scraper = ForumScraper::new(fetcher, config.scraper_settings());
    let app = server::router(AppState::new(scraper, config.communities().clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), "api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
