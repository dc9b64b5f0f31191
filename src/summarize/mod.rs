pub mod groq;
pub mod prompts;

pub use groq::GroqSummarizer;
pub use prompts::SummaryPrompt;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Connection settings for an OpenAI-compatible chat-completion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub base_url: Url,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion response had no content")]
    EmptyResponse,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// One completion call, no retries.
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<String, SummarizeError>;
}
