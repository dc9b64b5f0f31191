//! Configuration handling for the application.
//!
//! Every value comes from the environment (a `.env` file is honoured by the
//! binaries through `dotenvy`) with development defaults, except for the two
//! secrets which have no sensible default and are only demanded by the
//! binaries that need them.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use url::Url;

use crate::forum::{CommunityAllowList, ScraperSettings};
use crate::summarize::LlmSettings;

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_FORUM_ORIGIN: &str = "FORUM_ORIGIN";
pub const ENV_FORUM_COMMUNITIES: &str = "FORUM_COMMUNITIES";
pub const ENV_POST_CAP: &str = "POST_CAP";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_DETAIL_FETCH_DELAY_MS: &str = "DETAIL_FETCH_DELAY_MS";
pub const ENV_SEARCH_ENDPOINT: &str = "SEARCH_ENDPOINT";
pub const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
pub const ENV_LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
pub const ENV_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";
pub const ENV_LLM_API_KEY: &str = "GROQ_API_KEY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FORUM_ORIGIN: &str = "https://old.reddit.com";
const DEFAULT_FORUM_COMMUNITIES: &str = "privacy,hacking,netsec,scams";
const DEFAULT_POST_CAP: usize = 5;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DETAIL_FETCH_DELAY_MS: u64 = 2000;
const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_LLM_MAX_TOKENS: u32 = 1000;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    forum_origin: Url,
    communities: CommunityAllowList,
    post_cap: usize,
    http_timeout: Duration,
    detail_fetch_delay: Duration,
    search_endpoint: Url,
    llm_base_url: Url,
    llm_model: String,
    llm_max_tokens: u32,
    bot_token: Option<String>,
    llm_api_key: Option<String>,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let forum_origin = parse_url(ENV_FORUM_ORIGIN, DEFAULT_FORUM_ORIGIN)?;
        let communities = parse_communities()?;
        let post_cap = parse_number(ENV_POST_CAP, DEFAULT_POST_CAP)?;
        if post_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_POST_CAP,
                reason: "must be at least 1".to_string(),
            });
        }
        let http_timeout =
            Duration::from_secs(parse_number(ENV_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS)?);
        let detail_fetch_delay = Duration::from_millis(parse_number(
            ENV_DETAIL_FETCH_DELAY_MS,
            DEFAULT_DETAIL_FETCH_DELAY_MS,
        )?);
        let search_endpoint = parse_url(ENV_SEARCH_ENDPOINT, DEFAULT_SEARCH_ENDPOINT)?;
        let llm_base_url = parse_url(ENV_LLM_BASE_URL, DEFAULT_LLM_BASE_URL)?;
        let llm_model = env::var(ENV_LLM_MODEL).unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());
        let llm_max_tokens = parse_number(ENV_LLM_MAX_TOKENS, DEFAULT_LLM_MAX_TOKENS)?;

        Ok(Self {
            bind_addr,
            forum_origin,
            communities,
            post_cap,
            http_timeout,
            detail_fetch_delay,
            search_endpoint,
            llm_base_url,
            llm_model,
            llm_max_tokens,
            bot_token: non_empty_var(ENV_BOT_TOKEN),
            llm_api_key: non_empty_var(ENV_LLM_API_KEY),
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn forum_origin(&self) -> &Url {
        &self.forum_origin
    }

    pub fn communities(&self) -> &CommunityAllowList {
        &self.communities
    }

    /// Per-request timeout applied to every outbound HTTP call.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    pub fn search_endpoint(&self) -> &Url {
        &self.search_endpoint
    }

    pub fn scraper_settings(&self) -> ScraperSettings {
        ScraperSettings {
            origin: self.forum_origin.clone(),
            post_cap: self.post_cap,
            detail_fetch_delay: self.detail_fetch_delay,
        }
    }

    /// Language-model settings. Fails when the API key is not configured.
    pub fn llm_settings(&self) -> Result<LlmSettings, ConfigError> {
        let api_key = self
            .llm_api_key
            .clone()
            .ok_or(ConfigError::Missing(ENV_LLM_API_KEY))?;
        Ok(LlmSettings {
            base_url: self.llm_base_url.clone(),
            api_key,
            model: self.llm_model.clone(),
            max_tokens: self.llm_max_tokens,
        })
    }

    /// Chat platform credential. Fails when it is not configured.
    pub fn bot_token(&self) -> Result<&str, ConfigError> {
        self.bot_token
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_BOT_TOKEN))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_url(field: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env::var(field).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}

fn parse_number<T>(field: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match env::var(field) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_communities() -> Result<CommunityAllowList, ConfigError> {
    let raw = env::var(ENV_FORUM_COMMUNITIES)
        .unwrap_or_else(|_| DEFAULT_FORUM_COMMUNITIES.to_string());
    CommunityAllowList::parse(&raw).map_err(|reason| ConfigError::InvalidValue {
        field: ENV_FORUM_COMMUNITIES,
        reason,
    })
}

/// Errors that can occur while building a configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    Missing(&'static str),
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(field) => write!(f, "missing required variable '{}'", field),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
