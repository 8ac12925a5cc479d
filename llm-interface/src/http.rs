//! Generic summarization endpoint: `POST {title, repository, labels}` → `{guide}`.

use crate::{GuideProvider, GuideRequest};
use issuequest_core::{CoreError, LlmError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

const PROVIDER: &str = "http";

#[derive(Debug, Deserialize)]
struct GuideResponse {
    guide: String,
}

pub struct HttpGuideBackend {
    http_client: Client,
    endpoint: String,
}

impl HttpGuideBackend {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, CoreError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }
}

impl GuideProvider for HttpGuideBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate_guide(&self, request: &GuideRequest) -> Result<String, CoreError> {
        debug!("Requesting guide for '{}' from {}", request.title, self.endpoint);
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Guide backend request failed: {}", e);
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
            error!("Guide backend returned {}", status);
            return Err(LlmError::ServiceUnavailable {
                provider: PROVIDER.to_string(),
                status_code: status.as_u16(),
            }
            .into());
        }

        let body: GuideResponse = response.json().await.map_err(|e| {
            error!("Failed to parse guide response: {}", e);
            LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
            }
        })?;

        if body.guide.trim().is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: PROVIDER.to_string(),
            }
            .into());
        }
        Ok(body.guide)
    }
}
