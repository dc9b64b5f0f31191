use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::summarize::{LlmSettings, SummarizeError, Summarizer, SummaryPrompt};

/// Chat-completion client for Groq or any other OpenAI-compatible endpoint.
pub struct GroqSummarizer {
    client: Client,
    settings: LlmSettings,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl GroqSummarizer {
    pub fn new(client: Client, settings: LlmSettings) -> Self {
        Self { client, settings }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Summarizer for GroqSummarizer {
    #[instrument(skip_all, fields(model = %self.settings.model))]
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<String, SummarizeError> {
        let request = CompletionRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api { status, body });
        }

        let completion: CompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummarizeError::EmptyResponse)?;

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }
}
