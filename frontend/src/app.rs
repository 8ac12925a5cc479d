use database::{BookmarkStore, KeyValueStore};
use issuequest_core::{CoreError, ErrorExt, Issue, IssueId, Stats, Tab};
use llm_interface::{GuideAction, GuideRequest, GuideRequester};
use search_controller::{Effect, Event, SearchController};
use tracing::debug;

#[derive(Debug)]
pub enum Message {
    Search(Event),
    SwitchTab(Tab),
    /// 1-based position in the current tab.
    ToggleBookmark(usize),
    /// 1-based position in the current tab.
    RequestGuide(usize),
    GuideLoaded {
        issue_id: IssueId,
        result: Result<String, CoreError>,
    },
}

/// Asynchronous work requested by [`App::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(Effect),
    FetchGuide {
        issue_id: IssueId,
        request: GuideRequest,
    },
}

pub struct App<S: KeyValueStore> {
    search: SearchController,
    bookmarks: BookmarkStore<S>,
    guides: GuideRequester,
    tab: Tab,
    toast: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(search: SearchController, bookmarks: BookmarkStore<S>) -> Self {
        Self {
            search,
            bookmarks,
            guides: GuideRequester::new(),
            tab: Tab::default(),
            toast: None,
        }
    }

    pub async fn update(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::Search(event) => self
                .search
                .handle(event)
                .into_iter()
                .map(Command::Search)
                .collect(),
            Message::SwitchTab(tab) => {
                self.tab = tab;
                Vec::new()
            }
            Message::ToggleBookmark(position) => {
                let Some(issue) = self.issue_at(position) else {
                    return Vec::new();
                };
                let outcome = self.bookmarks.toggle(&issue).await;
                self.toast = Some(match &outcome.persist_error {
                    Some(e) => format!("{} ({})", outcome.toast(), e.user_friendly_message()),
                    None => outcome.toast().to_string(),
                });
                Vec::new()
            }
            Message::RequestGuide(position) => {
                let Some(issue) = self.issue_at(position) else {
                    return Vec::new();
                };
                match self.guides.begin(&issue) {
                    GuideAction::Dispatch(request) => vec![Command::FetchGuide {
                        issue_id: issue.id,
                        request,
                    }],
                    action => {
                        debug!("Guide for issue {}: {:?}", issue.id, action);
                        Vec::new()
                    }
                }
            }
            Message::GuideLoaded { issue_id, result } => {
                self.guides.complete(issue_id, result);
                Vec::new()
            }
        }
    }

    /// Issues listed under the current tab, in display order.
    pub fn visible_issues(&self) -> Vec<&Issue> {
        match self.tab {
            Tab::Discover => self.search.issues().iter().collect(),
            Tab::Trending => self
                .search
                .issues()
                .iter()
                .filter(|issue| issue.is_trending)
                .collect(),
            Tab::Saved => self.bookmarks.issues().iter().collect(),
        }
    }

    pub fn stats(&self) -> Stats {
        Stats::collect(self.search.issues(), self.bookmarks.len())
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn bookmarks(&self) -> &BookmarkStore<S> {
        &self.bookmarks
    }

    pub fn guides(&self) -> &GuideRequester {
        &self.guides
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    pub fn clear_toast(&mut self) {
        self.toast = None;
    }

    fn issue_at(&mut self, position: usize) -> Option<Issue> {
        let issue = position
            .checked_sub(1)
            .and_then(|index| self.visible_issues().get(index).map(|issue| (*issue).clone()));
        if issue.is_none() {
            self.toast = Some(format!("No issue #{position} in this tab"));
        }
        issue
    }
}
