//! Saved issues, persisted as one JSON list under [`BOOKMARKS_KEY`].

use crate::KeyValueStore;
use issuequest_core::{CoreError, ErrorExt, Issue, IssueId};
use tracing::{debug, info, warn};

pub const BOOKMARKS_KEY: &str = "fav_issues";

pub const SAVED_TOAST: &str = "⭐ Saved to favorites!";
pub const REMOVED_TOAST: &str = "Removed from favorites";

/// Result of flipping one bookmark.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub saved: bool,
    /// Set when the in-memory change could not be written through.
    pub persist_error: Option<CoreError>,
}

impl ToggleOutcome {
    pub fn toast(&self) -> &'static str {
        if self.saved {
            SAVED_TOAST
        } else {
            REMOVED_TOAST
        }
    }
}

pub struct BookmarkStore<S: KeyValueStore> {
    pub(crate) store: S,
    issues: Vec<Issue>,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    /// Reads the saved list once. Missing, unreadable or corrupt data yields an empty store.
    pub async fn load(store: S) -> Self {
        let issues = match store.get(BOOKMARKS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Issue>>(&raw) {
                Ok(mut issues) => {
                    let mut seen = std::collections::HashSet::new();
                    issues.retain(|issue| seen.insert(issue.id));
                    issues
                }
                Err(e) => {
                    warn!("Stored bookmarks are corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                e.log_warn();
                Vec::new()
            }
        };

        info!("Loaded {} bookmarks", issues.len());
        Self { store, issues }
    }

    pub async fn toggle(&mut self, issue: &Issue) -> ToggleOutcome {
        let saved = match self.issues.iter().position(|saved| saved.id == issue.id) {
            Some(index) => {
                self.issues.remove(index);
                false
            }
            None => {
                self.issues.push(issue.clone());
                true
            }
        };
        debug!(
            "Bookmark for issue {} {}",
            issue.id,
            if saved { "added" } else { "removed" }
        );

        let persist_error = self.persist().await.err();
        if let Some(e) = &persist_error {
            e.log_error();
        }
        ToggleOutcome {
            saved,
            persist_error,
        }
    }

    pub fn is_bookmarked(&self, issue_id: IssueId) -> bool {
        self.issues.iter().any(|issue| issue.id == issue_id)
    }

    /// Saved issues in the order they were starred.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    async fn persist(&self) -> Result<(), CoreError> {
        let encoded = serde_json::to_string(&self.issues)?;
        self.store.set(BOOKMARKS_KEY, &encoded).await
    }
}
