//! Per-issue guide state: cached text, in-flight requests, and which panel is open.
//!
//! Requests are split in two so callers can run the provider call on their own task:
//! [`GuideRequester::begin`] decides what to do, [`GuideRequester::complete`] records the outcome.

use crate::{GuideProvider, GuideRequest};
use issuequest_core::{CoreError, ErrorExt, Issue, IssueId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

pub const FALLBACK_GUIDE: &str = "Unable to load AI analysis. Try reading the issue description \
and comments carefully, then look for related files in the repository.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideAction {
    /// Guide already cached; the panel visibility flipped.
    Toggled { visible: bool },
    /// Nothing cached yet; the caller should ask the provider.
    Dispatch(GuideRequest),
    /// A request for this issue is outstanding; only visibility changed.
    AlreadyInFlight { visible: bool },
}

#[derive(Debug, Default)]
pub struct GuideRequester {
    cache: HashMap<IssueId, String>,
    in_flight: HashSet<IssueId>,
    expanded: Option<IssueId>,
}

impl GuideRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, issue: &Issue) -> GuideAction {
        if self.cache.contains_key(&issue.id) {
            let visible = self.toggle(issue.id);
            return GuideAction::Toggled { visible };
        }

        if self.in_flight.contains(&issue.id) {
            let visible = self.toggle(issue.id);
            return GuideAction::AlreadyInFlight { visible };
        }

        self.in_flight.insert(issue.id);
        self.expanded = Some(issue.id);
        debug!("Dispatching guide request for issue {}", issue.id);
        GuideAction::Dispatch(GuideRequest::from(issue))
    }

    /// Failures and blank text cache the fallback, so the issue is never retried.
    pub fn complete(&mut self, issue_id: IssueId, result: Result<String, CoreError>) -> &str {
        self.in_flight.remove(&issue_id);
        let text = match result {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                info!("Guide for issue {} came back blank, using fallback", issue_id);
                FALLBACK_GUIDE.to_string()
            }
            Err(e) => {
                e.log_warn();
                FALLBACK_GUIDE.to_string()
            }
        };
        self.cache.entry(issue_id).or_insert(text)
    }

    /// Runs both halves inline against `provider`.
    pub async fn request<P: GuideProvider>(&mut self, issue: &Issue, provider: &P) -> GuideAction {
        let action = self.begin(issue);
        if let GuideAction::Dispatch(request) = &action {
            let result = provider.generate_guide(request).await;
            self.complete(issue.id, result);
        }
        action
    }

    pub fn guide(&self, issue_id: IssueId) -> Option<&str> {
        self.cache.get(&issue_id).map(String::as_str)
    }

    pub fn is_loading(&self, issue_id: IssueId) -> bool {
        self.in_flight.contains(&issue_id)
    }

    pub fn expanded(&self) -> Option<IssueId> {
        self.expanded
    }

    pub fn is_expanded(&self, issue_id: IssueId) -> bool {
        self.expanded == Some(issue_id)
    }

    fn toggle(&mut self, issue_id: IssueId) -> bool {
        if self.expanded == Some(issue_id) {
            self.expanded = None;
            false
        } else {
            self.expanded = Some(issue_id);
            true
        }
    }
}
