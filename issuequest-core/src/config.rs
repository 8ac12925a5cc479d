//! Application configuration loaded from TOML with environment overrides.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_PER_PAGE: u32 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 600;
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub guide: GuideConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitHubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Personal access token. Optional; raises the search rate limit when set.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            per_page: default_per_page(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Quiet period before typed search text is committed.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuideBackend {
    #[default]
    Claude,
    Http,
    None,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GuideConfig {
    #[serde(default)]
    pub backend: GuideBackend,
    /// Summarization endpoint for the `http` backend.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            backend: GuideBackend::default(),
            endpoint: None,
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl AppConfig {
    /// Load from an explicit path (which must exist) or from the default
    /// location (which may be absent), then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::from_file(path)?
            }
            None => match config_file_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `GITHUB_TOKEN` and `ANTHROPIC_API_KEY` win over file values; empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(token) = non_empty_env("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(key) = non_empty_env("ANTHROPIC_API_KEY") {
            self.guide.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.github.per_page) {
            return Err(ConfigError::InvalidValue {
                field: "github.per_page".to_string(),
                value: self.github.per_page.to_string(),
            });
        }
        if self.github.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "github.timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// `$ISSUEQUEST_CONFIG`, else `$XDG_CONFIG_HOME/issuequest/config.toml`,
/// else `~/.config/issuequest/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = non_empty_env("ISSUEQUEST_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let base = non_empty_env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty_env("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("issuequest").join("config.toml"))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_api_base() -> String {
    DEFAULT_GITHUB_API_BASE.to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_user_agent() -> String {
    format!("issuequest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_model() -> String {
    DEFAULT_CLAUDE_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_database_url() -> String {
    "sqlite://issuequest.db".to_string()
}
