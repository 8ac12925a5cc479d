//! Translation of [`FilterState`] into a GitHub issue search query.

use crate::types::{DateWindow, DifficultyTier, FilterState};
use chrono::{Days, Months, NaiveDate};

/// Predicate every query starts with: open issues carrying the newcomer label.
pub const BASE_PREDICATE: &str = "label:\"good first issue\" state:open";

/// Build the search query for `filters`, with date windows measured back from `today`.
///
/// Clauses only appear for filters that differ from their default, so the
/// default filter state yields exactly [`BASE_PREDICATE`].
pub fn build_query(filters: &FilterState, today: NaiveDate) -> String {
    let mut clauses = vec![BASE_PREDICATE.to_string()];

    if let Some(language) = filters.language.as_tag() {
        clauses.push(language_clause(language));
    }

    let term = filters.committed_search_term.trim();
    if !term.is_empty() {
        clauses.push(format!("{term} in:title"));
    }

    if let Some(since) = created_after(filters.date_window, today) {
        clauses.push(format!("created:>{}", since.format("%Y-%m-%d")));
    }

    if let Some(tier) = filters.difficulty.tier() {
        clauses.push(comments_clause(tier).to_string());
    }

    clauses.join(" ")
}

fn language_clause(language: &str) -> String {
    if language.chars().any(char::is_whitespace) {
        format!("language:\"{language}\"")
    } else {
        format!("language:{language}")
    }
}

/// The cut-off date for a window, or `None` when the window is unbounded.
pub fn created_after(window: DateWindow, today: NaiveDate) -> Option<NaiveDate> {
    match window {
        DateWindow::All => None,
        DateWindow::Today => today.checked_sub_days(Days::new(1)),
        DateWindow::Week => today.checked_sub_days(Days::new(7)),
        DateWindow::Month => today.checked_sub_months(Months::new(1)),
    }
}

fn comments_clause(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Easy => "comments:0..3",
        DifficultyTier::Medium => "comments:4..9",
        DifficultyTier::Hard => "comments:>=10",
    }
}
