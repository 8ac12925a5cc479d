use crate::{ClaudeProvider, GuideProvider, GuideRequest, HttpGuideBackend};
use issuequest_core::{CoreError, GuideBackend, GuideConfig, LlmError};
use std::time::Duration;
use tracing::{info, warn};

/// The guide backend selected by `[guide]` configuration.
pub enum ConfiguredGuide {
    Claude(ClaudeProvider),
    Http(HttpGuideBackend),
    /// Every request fails, so each issue shows the fallback text.
    Disabled,
}

impl ConfiguredGuide {
    /// A missing API key disables guides rather than failing startup.
    pub fn from_config(config: &GuideConfig, timeout: Duration) -> Result<Self, CoreError> {
        let backend = match config.backend {
            GuideBackend::Claude => match &config.api_key {
                Some(api_key) => ConfiguredGuide::Claude(ClaudeProvider::new(
                    api_key.clone(),
                    config.model.clone(),
                    config.max_tokens,
                    timeout,
                )?),
                None => {
                    warn!("No Anthropic API key configured, AI guides disabled");
                    ConfiguredGuide::Disabled
                }
            },
            GuideBackend::Http => match &config.endpoint {
                Some(endpoint) => {
                    ConfiguredGuide::Http(HttpGuideBackend::new(endpoint.clone(), timeout)?)
                }
                None => {
                    warn!("Guide backend is http but no endpoint is configured, AI guides disabled");
                    ConfiguredGuide::Disabled
                }
            },
            GuideBackend::None => ConfiguredGuide::Disabled,
        };
        info!("Guide backend: {}", backend.name());
        Ok(backend)
    }
}

impl GuideProvider for ConfiguredGuide {
    fn name(&self) -> &str {
        match self {
            ConfiguredGuide::Claude(provider) => provider.name(),
            ConfiguredGuide::Http(provider) => provider.name(),
            ConfiguredGuide::Disabled => "disabled",
        }
    }

    async fn generate_guide(&self, request: &GuideRequest) -> Result<String, CoreError> {
        match self {
            ConfiguredGuide::Claude(provider) => provider.generate_guide(request).await,
            ConfiguredGuide::Http(provider) => provider.generate_guide(request).await,
            ConfiguredGuide::Disabled => Err(LlmError::NotConfigured.into()),
        }
    }
}
