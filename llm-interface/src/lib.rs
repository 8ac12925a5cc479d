use issuequest_core::{CoreError, Issue};
use serde::Serialize;
use std::future::Future;

pub mod backend;
pub mod claude;
pub mod guide;
pub mod http;

pub use backend::ConfiguredGuide;
pub use claude::ClaudeProvider;
pub use guide::{GuideAction, GuideRequester, FALLBACK_GUIDE};
pub use http::HttpGuideBackend;

/// What a guide backend gets to see about an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideRequest {
    pub title: String,
    pub repository: String,
    pub labels: Vec<String>,
}

impl From<&Issue> for GuideRequest {
    fn from(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            repository: issue.repository_full_name.clone(),
            labels: issue.labels.clone(),
        }
    }
}

/// A backend that turns an issue summary into contributor guidance.
pub trait GuideProvider: Send + Sync {
    fn name(&self) -> &str;

    fn generate_guide(
        &self,
        request: &GuideRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}
