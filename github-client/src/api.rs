use crate::metrics::{ApiMetrics, MetricsCollector, RateLimitSnapshot, RequestMetrics};
use chrono::{DateTime, Utc};
use issuequest_core::{CoreError, GitHubApiError, GitHubConfig, Issue, SearchPage, SearchRequest};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const SEARCH_ISSUES_ENDPOINT: &str = "/search/issues";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchIssuesResponse {
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchIssueItem>,
}

/// One item of `GET /search/issues`, keeping only the fields the display model needs.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchIssueItem {
    pub id: u64,
    #[serde(default)]
    pub number: Option<u64>,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<SearchLabel>>,
    #[serde(default)]
    pub comments: Option<u32>,
    #[serde(default)]
    pub reactions: Option<SearchReactions>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchLabel {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchReactions {
    #[serde(default)]
    pub total_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Source of search result pages.
pub trait IssueSearch: Send + Sync {
    fn search_issues(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchPage, CoreError>> + Send;
}

#[derive(Debug)]
pub struct GitHubApiClient {
    http_client: Client,
    metrics: Arc<MetricsCollector>,
    api_base: String,
    token: Option<String>,
}

impl GitHubApiClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.token.is_none() {
            info!("No GitHub token configured, searches use the unauthenticated rate limit");
        }

        Ok(Self {
            http_client,
            metrics: Arc::new(MetricsCollector::new()),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchIssuesResponse, CoreError> {
        let url = format!("{}{}", self.api_base, SEARCH_ISSUES_ENDPOINT);
        let start_time = Instant::now();
        let page = request.page.to_string();
        let per_page = request.per_page.to_string();

        let mut request_builder = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .query(&[
                ("q", request.query.as_str()),
                ("sort", "created"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ]);

        if let Some(token) = &self.token {
            request_builder = request_builder.bearer_auth(token);
        }

        info!(
            "Searching GitHub issues (page {}): {}",
            request.page, request.query
        );
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for GET {}: {}", SEARCH_ISSUES_ENDPOINT, e);
                self.record(start_time, None, Some("network_error"), None)
                    .await;
                if e.is_timeout() {
                    return Err(GitHubApiError::RequestTimeout.into());
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        let rate_limit = rate_limit_snapshot(response.headers());

        if !status.is_success() {
            let reset_at = rate_limit.map(|r| r.reset_at);
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_default();
            let api_error = classify_status(status, reset_at, message);
            error!(
                "Request failed with status: {} for {}",
                status, SEARCH_ISSUES_ENDPOINT
            );
            let error_type = match &api_error {
                GitHubApiError::RateLimited { .. } => "rate_limited",
                GitHubApiError::Unauthorized => "unauthorized",
                GitHubApiError::QueryRejected { .. } => "query_rejected",
                GitHubApiError::ServerError { .. } => "server_error",
                _ => "unexpected_status",
            };
            self.record(start_time, Some(status.as_u16()), Some(error_type), rate_limit)
                .await;
            return Err(api_error.into());
        }

        let parsed = response.json::<SearchIssuesResponse>().await;
        match parsed {
            Ok(body) => {
                self.record(start_time, Some(status.as_u16()), None, rate_limit)
                    .await;
                if body.incomplete_results {
                    warn!("GitHub reported incomplete search results");
                }
                debug!(
                    "Search returned {} items ({} total)",
                    body.items.len(),
                    body.total_count
                );
                Ok(body)
            }
            Err(e) => {
                error!("Failed to parse search response: {}", e);
                self.record(
                    start_time,
                    Some(status.as_u16()),
                    Some("invalid_response"),
                    rate_limit,
                )
                .await;
                Err(GitHubApiError::InvalidResponse {
                    details: "Failed to parse issue search results".to_string(),
                }
                .into())
            }
        }
    }

    async fn record(
        &self,
        start_time: Instant,
        status_code: Option<u16>,
        error_type: Option<&str>,
        rate_limit: Option<RateLimitSnapshot>,
    ) {
        self.metrics
            .record_request(RequestMetrics {
                endpoint: SEARCH_ISSUES_ENDPOINT.to_string(),
                method: "GET".to_string(),
                status_code,
                response_time: start_time.elapsed(),
                success: error_type.is_none(),
                rate_limited: error_type == Some("rate_limited"),
                error_type: error_type.map(str::to_string),
                rate_limit,
            })
            .await;
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }
}

impl IssueSearch for GitHubApiClient {
    async fn search_issues(&self, request: &SearchRequest) -> Result<SearchPage, CoreError> {
        let response = self.search(request).await?;
        let items: Vec<Issue> = response.items.into_iter().map(Issue::from).collect();
        Ok(SearchPage {
            items,
            total_count: response.total_count,
        })
    }
}

fn classify_status(status: StatusCode, reset_at: Option<i64>, message: String) -> GitHubApiError {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            warn!("GitHub rate limit hit (HTTP {}): {}", status.as_u16(), message);
            GitHubApiError::RateLimited {
                status_code: status.as_u16(),
                reset_at,
            }
        }
        StatusCode::UNAUTHORIZED => GitHubApiError::Unauthorized,
        StatusCode::UNPROCESSABLE_ENTITY => GitHubApiError::QueryRejected { message },
        s if s.is_server_error() => GitHubApiError::ServerError {
            status_code: s.as_u16(),
        },
        s => GitHubApiError::UnexpectedStatus {
            status_code: s.as_u16(),
        },
    }
}

fn rate_limit_snapshot(headers: &HeaderMap) -> Option<RateLimitSnapshot> {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Some(RateLimitSnapshot {
        limit: value("x-ratelimit-limit")?.parse().ok()?,
        remaining: value("x-ratelimit-remaining")?.parse().ok()?,
        reset_at: value("x-ratelimit-reset")?.parse().ok()?,
    })
}
