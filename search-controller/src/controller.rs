use chrono::{Local, NaiveDate};
use issuequest_core::{
    build_query, CoreError, DateWindow, DifficultyFilter, ErrorExt, FetchErrorKind, FilterState,
    Issue, IssueId, LanguageFilter, PaginationCursor, SearchPage, SearchRequest,
};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadingMore,
    Errored(FetchErrorKind),
}

#[derive(Debug)]
pub enum Event {
    /// Fetch the first page for the current filters, regardless of what is loaded.
    Refresh,
    SearchInputChanged(String),
    /// The debounce timer for `generation` fired.
    SearchCommitted { generation: u64 },
    LanguageChanged(LanguageFilter),
    DateWindowChanged(DateWindow),
    DifficultyChanged(DifficultyFilter),
    LoadMore,
    PageLoaded {
        request_id: RequestId,
        result: Result<SearchPage, CoreError>,
    },
    DismissError,
}

/// Work the owner of the controller must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch {
        request_id: RequestId,
        request: SearchRequest,
    },
    /// Deliver `SearchCommitted { generation }` after `delay`, replacing any pending commit.
    ScheduleCommit { generation: u64, delay: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    FirstPage,
    NextPage,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    request_id: RequestId,
    page: u32,
    kind: FetchKind,
}

/// Owns the search session: filters, loaded issues, pagination and fetch status.
pub struct SearchController {
    filters: FilterState,
    state: SessionState,
    issues: Vec<Issue>,
    cursor: PaginationCursor,
    per_page: u32,
    debounce: Duration,
    debounce_generation: u64,
    next_request_id: RequestId,
    in_flight: Option<InFlight>,
    /// Query of the first page, reused for every later page of the same session.
    session_query: String,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl SearchController {
    pub fn new(filters: FilterState, per_page: u32, debounce: Duration) -> Self {
        Self {
            filters,
            state: SessionState::Idle,
            issues: Vec::new(),
            cursor: PaginationCursor::first_page(),
            per_page,
            debounce,
            debounce_generation: 0,
            next_request_id: 0,
            in_flight: None,
            session_query: String::new(),
            today: local_today,
        }
    }

    /// Replace the calendar source used for date windows.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Refresh => vec![self.start_first_page()],
            Event::SearchInputChanged(text) => {
                self.filters.raw_search_input = text;
                self.debounce_generation += 1;
                vec![Effect::ScheduleCommit {
                    generation: self.debounce_generation,
                    delay: self.debounce,
                }]
            }
            Event::SearchCommitted { generation } => {
                if generation != self.debounce_generation {
                    debug!("Ignoring superseded search commit {}", generation);
                    return Vec::new();
                }
                let mut next = self.filters.clone();
                next.committed_search_term = next.raw_search_input.clone();
                self.apply_filters(next)
            }
            Event::LanguageChanged(language) => {
                let next = FilterState {
                    language,
                    ..self.filters.clone()
                };
                self.apply_filters(next)
            }
            Event::DateWindowChanged(date_window) => {
                let next = FilterState {
                    date_window,
                    ..self.filters.clone()
                };
                self.apply_filters(next)
            }
            Event::DifficultyChanged(difficulty) => {
                let next = FilterState {
                    difficulty,
                    ..self.filters.clone()
                };
                self.apply_filters(next)
            }
            Event::LoadMore => self.load_more().into_iter().collect(),
            Event::PageLoaded { request_id, result } => {
                self.page_loaded(request_id, result);
                Vec::new()
            }
            Event::DismissError => {
                if matches!(self.state, SessionState::Errored(_)) {
                    self.state = SessionState::Loaded;
                }
                Vec::new()
            }
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.cursor
    }

    pub fn error(&self) -> Option<FetchErrorKind> {
        match self.state {
            SessionState::Errored(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading | SessionState::LoadingMore)
    }

    pub fn can_load_more(&self) -> bool {
        self.state == SessionState::Loaded && self.cursor.has_more
    }

    pub fn current_query(&self) -> String {
        build_query(&self.filters, (self.today)())
    }

    /// Commits `next` when it changes the query; the raw input always follows along.
    fn apply_filters(&mut self, next: FilterState) -> Vec<Effect> {
        let changed = !self.filters.same_query(&next);
        self.filters = next;
        if !changed {
            debug!("Filters unchanged, no new search");
            return Vec::new();
        }
        vec![self.start_first_page()]
    }

    fn start_first_page(&mut self) -> Effect {
        self.issues.clear();
        self.cursor = PaginationCursor::first_page();
        self.state = SessionState::Loading;
        self.session_query = self.current_query();
        info!("Searching: {}", self.session_query);
        self.dispatch(1, FetchKind::FirstPage)
    }

    fn load_more(&mut self) -> Option<Effect> {
        if !self.can_load_more() {
            debug!(
                "Load more ignored in state {:?} (has_more = {})",
                self.state, self.cursor.has_more
            );
            return None;
        }
        self.state = SessionState::LoadingMore;
        Some(self.dispatch(self.cursor.page + 1, FetchKind::NextPage))
    }

    fn dispatch(&mut self, page: u32, kind: FetchKind) -> Effect {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.in_flight = Some(InFlight {
            request_id,
            page,
            kind,
        });
        Effect::Fetch {
            request_id,
            request: SearchRequest {
                query: self.session_query.clone(),
                page,
                per_page: self.per_page,
            },
        }
    }

    fn page_loaded(&mut self, request_id: RequestId, result: Result<SearchPage, CoreError>) {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.request_id == request_id => in_flight,
            _ => {
                debug!("Dropping stale response for request {}", request_id);
                return;
            }
        };
        self.in_flight = None;

        match result {
            Ok(page) => {
                let received = page.items.len();
                if in_flight.kind == FetchKind::FirstPage {
                    self.issues.clear();
                }
                let mut seen: HashSet<IssueId> = self.issues.iter().map(|i| i.id).collect();
                self.issues
                    .extend(page.items.into_iter().filter(|issue| seen.insert(issue.id)));
                self.cursor
                    .record_page(in_flight.page, received, self.per_page, page.total_count);
                self.state = SessionState::Loaded;
                info!(
                    "Page {} loaded: {} items, {} total shown",
                    in_flight.page,
                    received,
                    self.issues.len()
                );
            }
            Err(e) => {
                e.log_warn();
                let kind = e.fetch_error_kind();
                warn!("Search failed on page {}: {:?}", in_flight.page, kind);
                self.state = SessionState::Errored(kind);
            }
        }
    }
}
