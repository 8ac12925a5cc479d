use crate::{GuideProvider, GuideRequest};
use issuequest_core::{CoreError, LlmError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

const PROVIDER: &str = "claude";
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct ClaudeProvider {
    http_client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl ClaudeProvider {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            model,
            max_tokens,
            base_url: ANTHROPIC_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// The mentor prompt: skills needed, how to approach it, and a time estimate.
pub fn mentor_prompt(request: &GuideRequest) -> String {
    format!(
        "You are an open source mentor. A beginner wants to work on this GitHub issue:\n\
         Title: \"{title}\"\n\
         Repo: {repository}\n\
         Labels: {labels}\n\
         \n\
         Give a concise, encouraging analysis in 3 parts:\n\
         1. 🧠 What skills you need (2-3 bullets)\n\
         2. 🚀 How to approach it (2-3 steps)\n\
         3. ⏱️ Estimated time for a beginner\n\
         \n\
         Keep it under 150 words. Be friendly and motivating.",
        title = request.title,
        repository = request.repository,
        labels = request.labels.join(", "),
    )
}

impl GuideProvider for ClaudeProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate_guide(&self, request: &GuideRequest) -> Result<String, CoreError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: mentor_prompt(request),
            }],
        };

        debug!("Asking {} for a guide on '{}'", self.model, request.title);
        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.base_url.trim_end_matches('/')))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Claude request failed: {}", e);
                if e.is_timeout() {
                    CoreError::Llm(LlmError::RequestTimeout {
                        provider: PROVIDER.to_string(),
                    })
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Claude API returned {}", status);
            let err = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::InvalidApiKey {
                    provider: PROVIDER.to_string(),
                },
                StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded {
                    provider: PROVIDER.to_string(),
                },
                s => LlmError::ServiceUnavailable {
                    provider: PROVIDER.to_string(),
                    status_code: s.as_u16(),
                },
            };
            return Err(err.into());
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Claude response: {}", e);
            LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
            }
        })?;

        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: PROVIDER.to_string(),
            }
            .into());
        }
        Ok(text)
    }
}
