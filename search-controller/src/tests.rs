#[cfg(test)]
mod tests {
    use crate::{run_fetch, Debouncer, Effect, Event, SearchController, SessionState};
    use chrono::NaiveDate;
    use github_client::IssueSearch;
    use issuequest_core::{
        CoreError, DateWindow, DifficultyFilter, DifficultyTier, FetchErrorKind, FilterState,
        GitHubApiError, Issue, IssueId, LanguageFilter, SearchPage, SearchRequest,
    };
    use rstest::rstest;
    use std::collections::VecDeque;
    use std::ops::Range;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    const PER_PAGE: u32 = 30;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn controller() -> SearchController {
        SearchController::new(FilterState::default(), PER_PAGE, Duration::from_millis(600))
            .with_today(fixed_today)
    }

    fn issues(ids: Range<IssueId>) -> Vec<Issue> {
        ids.map(|id| Issue {
            id,
            number: id,
            title: format!("Issue {id}"),
            repository_full_name: "rust-lang/rustlings".to_string(),
            labels: vec!["good first issue".to_string()],
            comment_count: 1,
            reaction_count: 0,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
            source_url: format!("https://github.com/rust-lang/rustlings/issues/{id}"),
            difficulty: DifficultyTier::Easy,
            is_trending: false,
            avatar_url: "https://github.com/rust-lang.png".to_string(),
        })
        .collect()
    }

    fn page(ids: Range<IssueId>, total_count: u32) -> Result<SearchPage, CoreError> {
        Ok(SearchPage {
            items: issues(ids),
            total_count,
        })
    }

    /// Replays canned pages in order and records every request it sees.
    #[derive(Default)]
    struct ScriptedSearch {
        responses: Mutex<VecDeque<Result<SearchPage, CoreError>>>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl ScriptedSearch {
        fn with(responses: Vec<Result<SearchPage, CoreError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<SearchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl IssueSearch for ScriptedSearch {
        async fn search_issues(&self, request: &SearchRequest) -> Result<SearchPage, CoreError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(SearchPage::default()))
        }
    }

    fn single_fetch(effects: Vec<Effect>) -> (u64, SearchRequest) {
        assert_eq!(effects.len(), 1, "expected one effect, got {effects:?}");
        match effects.into_iter().next() {
            Some(Effect::Fetch {
                request_id,
                request,
            }) => (request_id, request),
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    async fn drive(
        controller: &mut SearchController,
        search: &ScriptedSearch,
        effects: Vec<Effect>,
    ) {
        let (request_id, request) = single_fetch(effects);
        let event = run_fetch(search, request_id, request).await;
        assert!(controller.handle(event).is_empty());
    }

    #[tokio::test]
    async fn test_rust_week_scenario_paginates() {
        let search = ScriptedSearch::with(vec![page(1..31, 412), page(31..43, 412)]);
        let mut controller = controller();

        let superseded = single_fetch(controller.handle(Event::LanguageChanged(
            LanguageFilter::Only("Rust".to_string()),
        )));
        let effects = controller.handle(Event::DateWindowChanged(DateWindow::Week));
        drive(&mut controller, &search, effects).await;

        // The language-only request was superseded by the date window change.
        let stale = controller.handle(Event::PageLoaded {
            request_id: superseded.0,
            result: page(900..930, 5000),
        });
        assert!(stale.is_empty());

        assert_eq!(
            search.requests()[0].query,
            "label:\"good first issue\" state:open language:Rust created:>2025-03-03"
        );
        assert_eq!(search.requests()[0].page, 1);
        assert_eq!(controller.state(), SessionState::Loaded);
        assert_eq!(controller.issues().len(), 30);
        assert!(controller.cursor().has_more);
        assert_eq!(controller.cursor().total_estimate, 412);

        let effects = controller.handle(Event::LoadMore);
        assert_eq!(controller.state(), SessionState::LoadingMore);
        drive(&mut controller, &search, effects).await;

        assert_eq!(search.requests()[1].page, 2);
        assert_eq!(search.requests()[1].per_page, PER_PAGE);
        assert_eq!(controller.issues().len(), 42);
        assert_eq!(controller.issues()[0].id, 1);
        assert_eq!(controller.issues()[41].id, 42);
        assert!(!controller.cursor().has_more);
        assert!(controller.handle(Event::LoadMore).is_empty());
    }

    #[tokio::test]
    async fn test_load_more_drops_duplicate_ids() {
        let search = ScriptedSearch::with(vec![page(1..31, 100), page(25..55, 100)]);
        let mut controller = controller();

        let effects = controller.handle(Event::Refresh);
        drive(&mut controller, &search, effects).await;
        let effects = controller.handle(Event::LoadMore);
        drive(&mut controller, &search, effects).await;

        let ids: Vec<IssueId> = controller.issues().iter().map(|i| i.id).collect();
        assert_eq!(ids, (1..55).collect::<Vec<_>>());
        // A full page arrived, so more may follow even though some were duplicates.
        assert!(controller.cursor().has_more);
        assert_eq!(controller.cursor().page, 2);
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_results_and_stops() {
        let search = ScriptedSearch::with(vec![
            page(1..31, 90),
            Err(GitHubApiError::RateLimited {
                status_code: 403,
                reset_at: None,
            }
            .into()),
        ]);
        let mut controller = controller();

        let effects = controller.handle(Event::Refresh);
        drive(&mut controller, &search, effects).await;
        let effects = controller.handle(Event::LoadMore);
        drive(&mut controller, &search, effects).await;

        assert_eq!(
            controller.state(),
            SessionState::Errored(FetchErrorKind::RateLimited)
        );
        assert_eq!(controller.error(), Some(FetchErrorKind::RateLimited));
        assert_eq!(controller.issues().len(), 30);
        assert_eq!(controller.cursor().page, 1);
        assert!(controller.handle(Event::LoadMore).is_empty());
        assert_eq!(search.requests().len(), 2);
    }

    #[rstest]
    #[case(GitHubApiError::QueryRejected { message: "Validation Failed".to_string() })]
    #[case(GitHubApiError::ServerError { status_code: 502 })]
    #[case(GitHubApiError::InvalidResponse { details: "expected value".to_string() })]
    #[tokio::test]
    async fn test_other_failures_are_network_errors(#[case] error: GitHubApiError) {
        let mut controller = controller();
        let (request_id, _) = single_fetch(controller.handle(Event::Refresh));
        controller.handle(Event::PageLoaded {
            request_id,
            result: Err(error.into()),
        });
        assert_eq!(controller.error(), Some(FetchErrorKind::Network));

        controller.handle(Event::DismissError);
        assert_eq!(controller.state(), SessionState::Loaded);
        assert_eq!(controller.error(), None);
    }

    static CLOCK_DAY: AtomicU32 = AtomicU32::new(10);

    fn shifting_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, CLOCK_DAY.load(Ordering::SeqCst)).unwrap()
    }

    #[test]
    fn test_load_more_keeps_the_session_query_across_midnight() {
        let mut controller =
            SearchController::new(FilterState::default(), PER_PAGE, Duration::from_millis(600))
                .with_today(shifting_today);

        let (request_id, first) =
            single_fetch(controller.handle(Event::DateWindowChanged(DateWindow::Today)));
        assert!(first.query.ends_with("created:>2025-03-09"));
        controller.handle(Event::PageLoaded {
            request_id,
            result: page(1..31, 200),
        });

        CLOCK_DAY.store(11, Ordering::SeqCst);
        let (_, second) = single_fetch(controller.handle(Event::LoadMore));
        assert_eq!(second.page, 2);
        assert_eq!(second.query, first.query);
        assert!(controller.current_query().ends_with("created:>2025-03-10"));

        let (_, refreshed) = single_fetch(controller.handle(Event::Refresh));
        assert_eq!(refreshed.page, 1);
        assert!(refreshed.query.ends_with("created:>2025-03-10"));
    }

    #[test]
    fn test_filter_change_resets_pagination() {
        let mut controller = controller();
        let (request_id, _) = single_fetch(controller.handle(Event::Refresh));
        controller.handle(Event::PageLoaded {
            request_id,
            result: page(1..31, 60),
        });
        let (request_id, _) = single_fetch(controller.handle(Event::LoadMore));
        controller.handle(Event::PageLoaded {
            request_id,
            result: page(31..61, 60),
        });
        assert_eq!(controller.cursor().page, 2);

        let (_, request) =
            single_fetch(controller.handle(Event::DifficultyChanged(DifficultyFilter::Hard)));
        assert_eq!(request.page, 1);
        assert!(request.query.ends_with("comments:>=10"));
        assert!(controller.issues().is_empty());
        assert_eq!(controller.state(), SessionState::Loading);
        assert_eq!(controller.cursor().page, 1);
    }

    #[test]
    fn test_same_filter_value_is_not_a_change() {
        let mut controller = controller();
        assert!(controller
            .handle(Event::LanguageChanged(LanguageFilter::All))
            .is_empty());
        assert!(controller
            .handle(Event::DateWindowChanged(DateWindow::All))
            .is_empty());
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn test_superseded_commit_is_ignored() {
        let mut controller = controller();
        controller.handle(Event::SearchInputChanged("pars".to_string()));
        controller.handle(Event::SearchInputChanged("parser".to_string()));

        assert!(controller
            .handle(Event::SearchCommitted { generation: 1 })
            .is_empty());
        assert_eq!(controller.filters().committed_search_term, "");

        let (_, request) = single_fetch(controller.handle(Event::SearchCommitted { generation: 2 }));
        assert!(request.query.contains("parser in:title"));
        assert_eq!(controller.filters().committed_search_term, "parser");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_commits_final_text_once() {
        let mut controller = controller();
        let mut debouncer = Debouncer::new();
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let start = Instant::now();

        for (i, text) in ["r", "ru", "rust"].into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            for effect in controller.handle(Event::SearchInputChanged(text.to_string())) {
                if let Effect::ScheduleCommit { generation, delay } = effect {
                    let tx = tx.clone();
                    debouncer.schedule(delay, async move {
                        let _ = tx.send(Event::SearchCommitted { generation }).await;
                    });
                }
            }
        }
        assert_eq!(controller.filters().raw_search_input, "rust");
        assert_eq!(controller.filters().committed_search_term, "");

        let committed = rx.recv().await.expect("commit delivered");
        assert!(start.elapsed() >= Duration::from_millis(800));

        let (_, request) = single_fetch(controller.handle(committed));
        assert!(request.query.contains("rust in:title"));
        assert_eq!(controller.filters().committed_search_term, "rust");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel_drops_pending_action() {
        let mut debouncer = Debouncer::new();
        let (tx, mut rx) = mpsc::channel::<u8>(1);
        debouncer.schedule(Duration::from_millis(600), async move {
            let _ = tx.send(1).await;
        });
        assert!(debouncer.is_pending());
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.recv().await.is_none());
    }
}
