use crate::error::*;
use crate::types::FetchErrorKind;
use tracing::{error, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl CoreError {
    /// Classify a failed search fetch for the error banner.
    ///
    /// Upstream throttling (403/429) is `RateLimited`; everything else, from DNS
    /// failures to malformed JSON, is `Network`.
    pub fn fetch_error_kind(&self) -> FetchErrorKind {
        match self {
            CoreError::GitHubApi(GitHubApiError::RateLimited { .. }) => FetchErrorKind::RateLimited,
            _ => FetchErrorKind::Network,
        }
    }
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError [{}]: {}", self.error_code(), self);
        match self {
            CoreError::GitHubApi(e) => {
                error!("GitHub API error details: {:?}", e);
            }
            CoreError::Database(e) => {
                error!("Database error details: {:?}", e);
            }
            CoreError::Llm(e) => {
                error!("LLM error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning) [{}]: {}", self.error_code(), self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::GitHubApi(e) => e.user_friendly_message(),
            CoreError::Database(e) => e.user_friendly_message(),
            CoreError::Llm(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => message.clone(),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::GitHubApi(e) => e.error_code(),
            CoreError::Database(e) => e.error_code(),
            CoreError::Llm(e) => e.error_code(),
            CoreError::Config(e) => e.error_code(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
        }
    }
}

impl ErrorExt for GitHubApiError {
    fn log_error(&self) -> &Self {
        error!("GitHubApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("GitHubApiError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            GitHubApiError::RateLimited { .. } => {
                "GitHub rate limit reached. Set GITHUB_TOKEN for a higher limit, or wait a minute."
                    .to_string()
            }
            GitHubApiError::Unauthorized => {
                "GitHub rejected the configured token. Please check GITHUB_TOKEN.".to_string()
            }
            GitHubApiError::QueryRejected { .. } => {
                "GitHub could not process this search. Try fewer or shorter filters.".to_string()
            }
            GitHubApiError::RequestTimeout => {
                "Request to GitHub timed out. Please try again.".to_string()
            }
            _ => "GitHub API error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            GitHubApiError::RateLimited { .. } => "GITHUB_RATE_LIMIT".to_string(),
            GitHubApiError::Unauthorized => "GITHUB_UNAUTHORIZED".to_string(),
            GitHubApiError::QueryRejected { .. } => "GITHUB_QUERY_REJECTED".to_string(),
            GitHubApiError::ServerError { .. } => "GITHUB_SERVER_ERROR".to_string(),
            GitHubApiError::UnexpectedStatus { .. } => "GITHUB_UNEXPECTED_STATUS".to_string(),
            GitHubApiError::RequestTimeout => "GITHUB_TIMEOUT".to_string(),
            GitHubApiError::InvalidResponse { .. } => "GITHUB_INVALID_RESPONSE".to_string(),
        }
    }
}

impl ErrorExt for DatabaseError {
    fn log_error(&self) -> &Self {
        error!("DatabaseError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("DatabaseError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DatabaseError::ConnectionFailed { .. } => {
                "Could not open the local bookmark database.".to_string()
            }
            _ => "Saving bookmarks failed. Your changes are kept until you quit.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            DatabaseError::ConnectionFailed { .. } => "DB_CONNECTION_FAILED".to_string(),
            DatabaseError::MigrationFailed { .. } => "DB_MIGRATION_FAILED".to_string(),
            DatabaseError::QueryFailed { .. } => "DB_QUERY_FAILED".to_string(),
            DatabaseError::Sql(_) => "DB_SQL_ERROR".to_string(),
        }
    }
}

impl ErrorExt for LlmError {
    fn log_error(&self) -> &Self {
        error!("LlmError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("LlmError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LlmError::InvalidApiKey { provider } => format!(
                "Invalid API key for {}. Please update your credentials.",
                provider
            ),
            LlmError::RateLimitExceeded { provider } => {
                format!("Rate limit exceeded for {}. Please wait a moment.", provider)
            }
            LlmError::ServiceUnavailable { provider, .. } => format!(
                "{} service is temporarily unavailable. Please try again later.",
                provider
            ),
            LlmError::NotConfigured => {
                "AI guides are disabled. Set ANTHROPIC_API_KEY or configure [guide].".to_string()
            }
            _ => "AI service error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            LlmError::InvalidApiKey { .. } => "LLM_INVALID_API_KEY".to_string(),
            LlmError::RateLimitExceeded { .. } => "LLM_RATE_LIMIT".to_string(),
            LlmError::ServiceUnavailable { .. } => "LLM_SERVICE_UNAVAILABLE".to_string(),
            LlmError::RequestTimeout { .. } => "LLM_TIMEOUT".to_string(),
            LlmError::InvalidResponseFormat { .. } => "LLM_INVALID_RESPONSE".to_string(),
            LlmError::EmptyResponse { .. } => "LLM_EMPTY_RESPONSE".to_string(),
            LlmError::NotConfigured => "LLM_NOT_CONFIGURED".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}
