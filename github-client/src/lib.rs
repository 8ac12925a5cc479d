pub mod api;
pub mod mapper;
pub mod metrics;


pub use api::{GitHubApiClient, IssueSearch};
pub use metrics::{ApiMetrics, RateLimitSnapshot};
