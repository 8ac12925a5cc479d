pub mod controller;
pub mod debounce;

#[cfg(test)]
mod tests;

pub use controller::{Effect, Event, RequestId, SearchController, SessionState};
pub use debounce::Debouncer;

use github_client::IssueSearch;
use issuequest_core::SearchRequest;
use tracing::debug;

/// Run one [`Effect::Fetch`] against `client` and wrap the outcome for the controller.
pub async fn run_fetch<C: IssueSearch>(
    client: &C,
    request_id: RequestId,
    request: SearchRequest,
) -> Event {
    debug!(
        "Fetching page {} for request {}: {}",
        request.page, request_id, request.query
    );
    let result = client.search_issues(&request).await;
    Event::PageLoaded { request_id, result }
}
