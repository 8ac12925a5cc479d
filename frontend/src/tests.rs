#[cfg(test)]
mod tests {
    use crate::{render, App, Command, Message, Runtime, HELP};
    use chrono::NaiveDate;
    use database::bookmarks::{REMOVED_TOAST, SAVED_TOAST};
    use database::{BookmarkStore, MemoryStore};
    use github_client::IssueSearch;
    use issuequest_core::{
        CoreError, DifficultyTier, FetchErrorKind, FilterState, GitHubApiError, Issue, LlmError,
        SearchPage, SearchRequest, Tab,
    };
    use llm_interface::{GuideProvider, GuideRequest, FALLBACK_GUIDE};
    use search_controller::{Effect, Event, SearchController};
    use std::sync::Arc;
    use std::time::Duration;

    fn issue(id: u64, title: &str, labels: &[&str], is_trending: bool) -> Issue {
        Issue {
            id,
            number: id,
            title: title.to_string(),
            repository_full_name: "sveltejs/kit".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            comment_count: 3,
            reaction_count: if is_trending { 9 } else { 0 },
            created_at: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
            source_url: format!("https://github.com/sveltejs/kit/issues/{id}"),
            difficulty: DifficultyTier::Easy,
            is_trending,
            avatar_url: "https://github.com/sveltejs.png".to_string(),
        }
    }

    fn sample_issues() -> Vec<Issue> {
        vec![
            issue(
                11,
                "Document the preload option",
                &["good first issue", "documentation", "help wanted", "p3"],
                false,
            ),
            issue(12, "Typo in adapter-node README", &["good first issue"], true),
            issue(13, "Add example for form actions", &["Good First Issue", "examples"], false),
        ]
    }

    fn controller() -> SearchController {
        SearchController::new(FilterState::default(), 30, Duration::from_millis(600))
            .with_today(|| NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    async fn loaded_app(items: Vec<Issue>) -> App<MemoryStore> {
        let bookmarks = BookmarkStore::load(MemoryStore::new()).await;
        let mut app = App::new(controller(), bookmarks);
        let commands = app.update(Message::Search(Event::Refresh)).await;
        let request_id = match commands.as_slice() {
            [Command::Search(Effect::Fetch { request_id, .. })] => *request_id,
            other => panic!("expected one fetch, got {other:?}"),
        };
        let total_count = items.len() as u32;
        app.update(Message::Search(Event::PageLoaded {
            request_id,
            result: Ok(SearchPage { items, total_count }),
        }))
        .await;
        app
    }

    struct CannedSearch(Vec<Issue>);

    impl IssueSearch for CannedSearch {
        async fn search_issues(&self, request: &SearchRequest) -> Result<SearchPage, CoreError> {
            assert_eq!(request.page, 1);
            Ok(SearchPage {
                items: self.0.clone(),
                total_count: self.0.len() as u32,
            })
        }
    }

    struct StaticGuide(Result<&'static str, ()>);

    impl GuideProvider for StaticGuide {
        fn name(&self) -> &str {
            "static"
        }

        async fn generate_guide(&self, _request: &GuideRequest) -> Result<String, CoreError> {
            self.0
                .map(str::to_string)
                .map_err(|()| {
                    CoreError::from(LlmError::RequestTimeout {
                        provider: "static".to_string(),
                    })
                })
        }
    }

    #[tokio::test]
    async fn test_star_then_unstar_from_saved_tab() {
        let mut app = loaded_app(sample_issues()).await;

        app.update(Message::ToggleBookmark(2)).await;
        assert_eq!(app.toast(), Some(SAVED_TOAST));
        assert!(app.bookmarks().is_bookmarked(12));
        assert_eq!(app.stats().saved, 1);

        app.update(Message::SwitchTab(Tab::Saved)).await;
        let saved: Vec<u64> = app.visible_issues().iter().map(|i| i.id).collect();
        assert_eq!(saved, vec![12]);
        assert!(render(&app).contains("[Saved (1)]"));

        app.update(Message::ToggleBookmark(1)).await;
        assert_eq!(app.toast(), Some(REMOVED_TOAST));
        let view = render(&app);
        assert!(view.contains("No saved issues yet"));
        assert!(view.contains(REMOVED_TOAST));
    }

    #[tokio::test]
    async fn test_trending_tab_positions_follow_filtered_list() {
        let mut app = loaded_app(sample_issues()).await;
        app.update(Message::SwitchTab(Tab::Trending)).await;
        assert_eq!(app.visible_issues().len(), 1);

        app.update(Message::ToggleBookmark(1)).await;
        assert!(app.bookmarks().is_bookmarked(12));

        app.update(Message::ToggleBookmark(2)).await;
        assert_eq!(app.toast(), Some("No issue #2 in this tab"));
        assert_eq!(app.bookmarks().len(), 1);
    }

    #[tokio::test]
    async fn test_guide_failure_shows_fallback_and_toggles() {
        let mut app = loaded_app(sample_issues()).await;

        let commands = app.update(Message::RequestGuide(1)).await;
        assert_eq!(
            commands,
            vec![Command::FetchGuide {
                issue_id: 11,
                request: GuideRequest {
                    title: "Document the preload option".to_string(),
                    repository: "sveltejs/kit".to_string(),
                    labels: vec![
                        "good first issue".to_string(),
                        "documentation".to_string(),
                        "help wanted".to_string(),
                        "p3".to_string(),
                    ],
                },
            }]
        );
        assert!(render(&app).contains("Analyzing issue…"));

        app.update(Message::GuideLoaded {
            issue_id: 11,
            result: Err(LlmError::RequestTimeout {
                provider: "claude".to_string(),
            }
            .into()),
        })
        .await;
        assert!(render(&app).contains(FALLBACK_GUIDE));

        assert!(app.update(Message::RequestGuide(1)).await.is_empty());
        assert!(!render(&app).contains(FALLBACK_GUIDE));
        assert!(app.update(Message::RequestGuide(1)).await.is_empty());
        assert!(render(&app).contains(FALLBACK_GUIDE));
    }

    #[tokio::test]
    async fn test_card_rendering() {
        let app = loaded_app(sample_issues()).await;
        let view = render(&app);

        assert!(view.contains("Total 3 · Easy 3 · Trending 1 · Saved 0"));
        assert!(view.contains("Showing 3 of 3 issues"));
        assert!(view.contains(" 1. sveltejs/kit\n"));
        assert!(view.contains(" 2. sveltejs/kit  🔥 Trending"));
        assert!(view.contains("Easy · 💬 3 · documentation, help wanted · Mar 8, 2025 · ☆"));
        assert!(view.contains("Easy · 💬 3 · examples · Mar 8, 2025 · ☆"));
        assert!(!view.contains("p3"));
        assert!(!view.contains("load more"));
    }

    #[tokio::test]
    async fn test_error_banner_after_filter_change() {
        let mut app = loaded_app(sample_issues()).await;
        let commands = app
            .update(Message::Search(Event::DifficultyChanged(
                issuequest_core::DifficultyFilter::Hard,
            )))
            .await;
        let request_id = match commands.as_slice() {
            [Command::Search(Effect::Fetch { request_id, .. })] => *request_id,
            other => panic!("expected one fetch, got {other:?}"),
        };
        assert!(render(&app).contains("Loading issues…"));

        app.update(Message::Search(Event::PageLoaded {
            request_id,
            result: Err(GitHubApiError::RateLimited {
                status_code: 429,
                reset_at: None,
            }
            .into()),
        }))
        .await;
        let view = render(&app);
        assert!(view.contains(FetchErrorKind::RateLimited.banner()));
        assert!(view.contains("No issues found"));

        app.update(Message::Search(Event::DismissError)).await;
        assert!(!render(&app).contains(FetchErrorKind::RateLimited.banner()));
    }

    #[tokio::test]
    async fn test_run_once_renders_first_page() {
        let bookmarks = BookmarkStore::load(MemoryStore::new()).await;
        let app = App::new(controller(), bookmarks);
        let mut runtime = Runtime::new(
            app,
            Arc::new(CannedSearch(sample_issues())),
            Arc::new(StaticGuide(Ok("unused"))),
        );

        let mut output = Vec::new();
        runtime.run_once(&mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Typo in adapter-node README"));
        assert!(output.contains("Showing 3 of 3 issues"));
    }

    #[tokio::test]
    async fn test_runtime_delivers_guides() {
        let bookmarks = BookmarkStore::load(MemoryStore::new()).await;
        let mut runtime = Runtime::new(
            App::new(controller(), bookmarks),
            Arc::new(CannedSearch(sample_issues())),
            Arc::new(StaticGuide(Ok("1. Skills: Markdown"))),
        );
        runtime.run_once(&mut Vec::new()).await.unwrap();

        runtime.send(Message::RequestGuide(3)).await;
        assert!(runtime.app().guides().is_loading(13));
        assert!(runtime.process_next().await);
        assert_eq!(runtime.app().guides().guide(13), Some("1. Skills: Markdown"));
    }

    #[tokio::test]
    async fn test_interactive_help_and_quit() {
        let bookmarks = BookmarkStore::load(MemoryStore::new()).await;
        let mut runtime = Runtime::new(
            App::new(controller(), bookmarks),
            Arc::new(CannedSearch(Vec::new())),
            Arc::new(StaticGuide(Err(()))),
        );

        let mut output = Vec::new();
        runtime
            .run_interactive(&b"help\nbogus\nquit\n"[..], &mut output)
            .await
            .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(HELP));
        assert!(output.contains("unknown command 'bogus'"));
    }
}
