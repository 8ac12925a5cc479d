//! Normalisation of raw search items into display [`Issue`]s.

use crate::api::SearchIssueItem;
use issuequest_core::{DifficultyTier, Issue};

pub const UNKNOWN_REPOSITORY: &str = "unknown/repo";

const HARD_KEYWORDS: &[&str] = &["hard", "complex", "advanced"];
const MEDIUM_KEYWORDS: &[&str] = &["medium", "intermediate"];

/// Classify by label text first, falling back to comment volume.
pub fn difficulty_for(labels: &[String], comment_count: u32) -> DifficultyTier {
    let lowered: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    let mentions = |keywords: &[&str]| {
        lowered
            .iter()
            .any(|label| keywords.iter().any(|k| label.contains(k)))
    };

    if mentions(HARD_KEYWORDS) {
        DifficultyTier::Hard
    } else if mentions(MEDIUM_KEYWORDS) {
        DifficultyTier::Medium
    } else if comment_count >= 10 {
        DifficultyTier::Hard
    } else if comment_count >= 4 {
        DifficultyTier::Medium
    } else {
        DifficultyTier::Easy
    }
}

pub fn is_trending(reaction_count: u32, comment_count: u32) -> bool {
    reaction_count > 3 || comment_count > 8
}

/// `https://api.github.com/repos/{owner}/{name}` → `{owner}/{name}`.
///
/// Works for any API host (GitHub Enterprise, mock servers) by splitting on `/repos/`.
pub fn repository_full_name(repository_url: Option<&str>) -> String {
    repository_url
        .and_then(|url| url.split_once("/repos/").map(|(_, rest)| rest))
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|rest| {
            let mut parts = rest.split('/');
            matches!(
                (parts.next(), parts.next(), parts.next()),
                (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
            )
        })
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_REPOSITORY.to_string())
}

pub fn avatar_url(repository_full_name: &str) -> String {
    let owner = repository_full_name
        .split('/')
        .next()
        .unwrap_or(repository_full_name);
    format!("https://github.com/{owner}.png")
}

impl From<SearchIssueItem> for Issue {
    fn from(item: SearchIssueItem) -> Self {
        let labels: Vec<String> = item
            .labels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|label| label.name)
            .filter(|name| !name.is_empty())
            .collect();
        let comment_count = item.comments.unwrap_or(0);
        let reaction_count = item
            .reactions
            .and_then(|r| r.total_count)
            .unwrap_or(0);
        let repository_full_name = repository_full_name(item.repository_url.as_deref());

        Self {
            id: item.id,
            number: item.number.unwrap_or_default(),
            title: item.title,
            difficulty: difficulty_for(&labels, comment_count),
            is_trending: is_trending(reaction_count, comment_count),
            avatar_url: avatar_url(&repository_full_name),
            repository_full_name,
            labels,
            comment_count,
            reaction_count,
            created_at: item.created_at.date_naive(),
            source_url: item.html_url,
        }
    }
}
