use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream issue identifier, stable across refetches of the same item.
pub type IssueId = u64;

/// The search API never reports more matches than this.
pub const MAX_REPORTABLE_RESULTS: u32 = 1000;

/// Languages offered by the language picker. Other values are passed through as-is.
pub const LANGUAGES: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Rust",
    "Go",
    "Java",
    "C++",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "HTML",
    "CSS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
}

impl DifficultyFilter {
    pub fn tier(&self) -> Option<DifficultyTier> {
        match self {
            DifficultyFilter::All => None,
            DifficultyFilter::Easy => Some(DifficultyTier::Easy),
            DifficultyFilter::Medium => Some(DifficultyTier::Medium),
            DifficultyFilter::Hard => Some(DifficultyTier::Hard),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DifficultyFilter::All),
            "easy" => Ok(DifficultyFilter::Easy),
            "medium" => Ok(DifficultyFilter::Medium),
            "hard" => Ok(DifficultyFilter::Hard),
            other => Err(CoreError::InvalidInput {
                message: format!("unknown difficulty '{other}' (expected all, easy, medium or hard)"),
            }),
        }
    }
}

/// How far back the "created after" predicate reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl FromStr for DateWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DateWindow::All),
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            "month" => Ok(DateWindow::Month),
            other => Err(CoreError::InvalidInput {
                message: format!("unknown date window '{other}' (expected all, today, week or month)"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LanguageFilter {
    #[default]
    All,
    Only(String),
}

impl LanguageFilter {
    pub fn as_tag(&self) -> Option<&str> {
        match self {
            LanguageFilter::All => None,
            LanguageFilter::Only(tag) => Some(tag),
        }
    }
}

impl FromStr for LanguageFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(LanguageFilter::All);
        }
        // Normalise known names so "rust" and "Rust" are the same filter.
        let tag = LANGUAGES
            .iter()
            .find(|known| known.eq_ignore_ascii_case(trimmed))
            .map(|known| known.to_string())
            .unwrap_or_else(|| trimmed.to_string());
        Ok(LanguageFilter::Only(tag))
    }
}

impl fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageFilter::All => f.write_str("All"),
            LanguageFilter::Only(tag) => f.write_str(tag),
        }
    }
}

/// Everything the user can set to narrow a search.
///
/// `raw_search_input` tracks the text box as typed; `committed_search_term`
/// only catches up once the input has been quiet for the debounce interval,
/// and only the committed term takes part in the query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub language: LanguageFilter,
    pub date_window: DateWindow,
    pub difficulty: DifficultyFilter,
    pub raw_search_input: String,
    pub committed_search_term: String,
}

impl FilterState {
    /// Whether two filter states would produce the same upstream query.
    pub fn same_query(&self, other: &FilterState) -> bool {
        self.language == other.language
            && self.date_window == other.date_window
            && self.difficulty == other.difficulty
            && self.committed_search_term.trim() == other.committed_search_term.trim()
    }
}

/// Display record for one upstream issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub number: u64,
    pub title: String,
    pub repository_full_name: String,
    pub labels: Vec<String>,
    pub comment_count: u32,
    pub reaction_count: u32,
    pub created_at: NaiveDate,
    pub source_url: String,
    pub difficulty: DifficultyTier,
    pub is_trending: bool,
    pub avatar_url: String,
}

/// One page request against the issue search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
}

/// One page of mapped results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub items: Vec<Issue>,
    pub total_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCursor {
    pub page: u32,
    pub has_more: bool,
    pub total_estimate: u32,
}

impl PaginationCursor {
    pub fn first_page() -> Self {
        Self {
            page: 1,
            has_more: false,
            total_estimate: 0,
        }
    }

    /// Record that `page` came back with `received` items out of `per_page` requested.
    ///
    /// More pages exist only after a full page, and only while the pages loaded so far
    /// stay below the reachable total.
    pub fn record_page(&mut self, page: u32, received: usize, per_page: u32, total_count: u32) {
        self.page = page;
        self.total_estimate = total_count.min(MAX_REPORTABLE_RESULTS);
        let loaded = u64::from(page) * u64::from(per_page);
        self.has_more = received >= per_page as usize && loaded < u64::from(self.total_estimate);
    }
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self::first_page()
    }
}

/// Failure classes surfaced to the user after a search fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchErrorKind {
    RateLimited,
    Network,
}

impl FetchErrorKind {
    pub fn banner(&self) -> &'static str {
        match self {
            FetchErrorKind::RateLimited => {
                "GitHub rate limit reached. Add a GITHUB_TOKEN or wait a minute before searching again."
            }
            FetchErrorKind::Network => {
                "Could not load issues. Check your connection and adjust a filter to try again."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Discover,
    Trending,
    Saved,
}

impl FromStr for Tab {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discover" => Ok(Tab::Discover),
            "trending" => Ok(Tab::Trending),
            "saved" | "favorites" => Ok(Tab::Saved),
            other => Err(CoreError::InvalidInput {
                message: format!("unknown tab '{other}' (expected discover, trending or saved)"),
            }),
        }
    }
}

/// Counters shown in the stats bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub easy: usize,
    pub trending: usize,
    pub saved: usize,
}

impl Stats {
    pub fn collect(issues: &[Issue], saved: usize) -> Self {
        Self {
            total: issues.len(),
            easy: issues
                .iter()
                .filter(|i| i.difficulty == DifficultyTier::Easy)
                .count(),
            trending: issues.iter().filter(|i| i.is_trending).count(),
            saved,
        }
    }
}
