//! Plain-text rendering of the application state.

use crate::app::App;
use database::KeyValueStore;
use issuequest_core::{DateWindow, DifficultyFilter, Issue, Tab};
use search_controller::SessionState;

const NEWCOMER_LABEL: &str = "good first issue";
const MAX_CARD_LABELS: usize = 2;

pub fn render<S: KeyValueStore>(app: &App<S>) -> String {
    let mut lines = vec![
        "🚀 IssueQuest: find your first open source contribution".to_string(),
        filters_line(app),
        tabs_line(app),
        stats_line(app),
    ];

    if let Some(kind) = app.search().error() {
        lines.push(format!("⚠️  {} (type `dismiss` to hide)", kind.banner()));
    }

    let issues = app.visible_issues();
    let state = app.search().state();
    if app.tab() != Tab::Saved && state == SessionState::Loading {
        lines.push("⏳ Loading issues…".to_string());
    } else if issues.is_empty() {
        lines.push(empty_message(app.tab()).to_string());
    } else {
        lines.push(result_count_line(app, issues.len()));
        for (index, issue) in issues.iter().enumerate() {
            lines.extend(card(app, index + 1, issue));
        }
    }

    if app.tab() == Tab::Discover {
        if state == SessionState::LoadingMore {
            lines.push("⏳ Loading more…".to_string());
        } else if app.search().can_load_more() {
            lines.push("Type `more` to load more issues.".to_string());
        }
    }

    if let Some(toast) = app.toast() {
        lines.push(format!("» {toast}"));
    }

    lines.join("\n")
}

fn filters_line<S: KeyValueStore>(app: &App<S>) -> String {
    let filters = app.search().filters();
    let mut line = format!(
        "Language: {} | Window: {} | Difficulty: {}",
        filters.language,
        window_name(filters.date_window),
        difficulty_name(filters.difficulty)
    );
    if !filters.raw_search_input.is_empty() {
        line.push_str(&format!(" | Search: \"{}\"", filters.raw_search_input));
    }
    line
}

fn tabs_line<S: KeyValueStore>(app: &App<S>) -> String {
    let tabs = [
        (Tab::Discover, "Discover".to_string()),
        (Tab::Trending, "Trending".to_string()),
        (Tab::Saved, format!("Saved ({})", app.bookmarks().len())),
    ];
    tabs.into_iter()
        .map(|(tab, name)| {
            if tab == app.tab() {
                format!("[{name}]")
            } else {
                name
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn stats_line<S: KeyValueStore>(app: &App<S>) -> String {
    let stats = app.stats();
    format!(
        "Total {} · Easy {} · Trending {} · Saved {}",
        stats.total, stats.easy, stats.trending, stats.saved
    )
}

fn result_count_line<S: KeyValueStore>(app: &App<S>, shown: usize) -> String {
    match app.tab() {
        Tab::Discover => {
            let total = app.search().cursor().total_estimate;
            format!("Showing {shown} of {total} issues")
        }
        Tab::Trending => format!("{shown} trending issues"),
        Tab::Saved => format!("{shown} saved issues"),
    }
}

fn empty_message(tab: Tab) -> &'static str {
    match tab {
        Tab::Saved => "No saved issues yet. Star issues to save them here.",
        Tab::Discover | Tab::Trending => "No issues found. Try adjusting your filters.",
    }
}

fn card<S: KeyValueStore>(app: &App<S>, position: usize, issue: &Issue) -> Vec<String> {
    let mut header = format!("{position:>2}. {}", issue.repository_full_name);
    if issue.is_trending {
        header.push_str("  🔥 Trending");
    }

    let mut details = vec![
        issue.difficulty.label().to_string(),
        format!("💬 {}", issue.comment_count),
    ];
    let labels = card_labels(issue);
    if !labels.is_empty() {
        details.push(labels.join(", "));
    }
    details.push(issue.created_at.format("%b %-d, %Y").to_string());
    details.push(
        if app.bookmarks().is_bookmarked(issue.id) {
            "★"
        } else {
            "☆"
        }
        .to_string(),
    );

    let mut lines = vec![
        header,
        format!("    {}", issue.title),
        format!("    {}", details.join(" · ")),
        format!("    {}", issue.source_url),
    ];

    let guides = app.guides();
    if guides.is_expanded(issue.id) {
        if guides.is_loading(issue.id) {
            lines.push("    🤖 Analyzing issue…".to_string());
        } else if let Some(guide) = guides.guide(issue.id) {
            lines.push("    🤖 AI guide:".to_string());
            lines.extend(guide.lines().map(|line| format!("    │ {line}")));
        }
    }
    lines
}

/// Up to two labels, skipping the newcomer label every result carries.
fn card_labels(issue: &Issue) -> Vec<&str> {
    issue
        .labels
        .iter()
        .map(String::as_str)
        .filter(|label| !label.eq_ignore_ascii_case(NEWCOMER_LABEL))
        .take(MAX_CARD_LABELS)
        .collect()
}

fn window_name(window: DateWindow) -> &'static str {
    match window {
        DateWindow::All => "all time",
        DateWindow::Today => "today",
        DateWindow::Week => "this week",
        DateWindow::Month => "this month",
    }
}

fn difficulty_name(difficulty: DifficultyFilter) -> &'static str {
    match difficulty.tier() {
        Some(tier) => tier.label(),
        None => "all",
    }
}
