use anyhow::Context;
use clap::Parser;
use database::{BookmarkStore, Database, KeyValueStore, MemoryStore};
use frontend::{App, Runtime};
use github_client::GitHubApiClient;
use issuequest_core::{AppConfig, DateWindow, DifficultyFilter, FilterState, LanguageFilter};
use llm_interface::ConfiguredGuide;
use search_controller::SearchController;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "issuequest=info,github_client=info,search_controller=info";

/// Find "good first issue" tickets on GitHub from the terminal.
#[derive(Debug, Parser)]
#[command(name = "issuequest", version, about)]
struct Cli {
    /// Configuration file (defaults to ~/.config/issuequest/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Only show issues in this language
    #[arg(long, default_value = "all")]
    language: LanguageFilter,

    /// Only show issues created within this window: all, today, week or month
    #[arg(long, default_value = "all")]
    window: DateWindow,

    /// Only show issues of this difficulty: all, easy, medium or hard
    #[arg(long, default_value = "all")]
    difficulty: DifficultyFilter,

    /// Free text matched against issue titles
    #[arg(long, default_value = "")]
    search: String,

    /// Run one search, print the results and exit
    #[arg(long)]
    once: bool,

    /// Keep bookmarks in memory instead of the configured database
    #[arg(long)]
    ephemeral: bool,
}

impl Cli {
    fn filters(&self) -> FilterState {
        FilterState {
            language: self.language.clone(),
            date_window: self.window,
            difficulty: self.difficulty,
            raw_search_input: self.search.clone(),
            committed_search_term: self.search.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    tracing::info!("Starting IssueQuest");

    if cli.ephemeral {
        run(&cli, &config, MemoryStore::new()).await
    } else {
        let mut db = Database::new(config.storage.database_url.clone());
        db.connect().await.context("failed to open bookmark database")?;
        db.run_migrations()
            .await
            .context("failed to prepare bookmark database")?;
        run(&cli, &config, db).await
    }
}

async fn run<S: KeyValueStore>(cli: &Cli, config: &AppConfig, store: S) -> anyhow::Result<()> {
    let client = Arc::new(
        GitHubApiClient::new(&config.github).context("failed to build GitHub client")?,
    );

    let timeout = Duration::from_secs(config.github.timeout_secs);
    let guide = ConfiguredGuide::from_config(&config.guide, timeout)
        .context("failed to build guide backend")?;

    let controller = SearchController::new(
        cli.filters(),
        config.github.per_page,
        Duration::from_millis(config.search.debounce_ms),
    );
    let bookmarks = BookmarkStore::load(store).await;
    let mut runtime = Runtime::new(
        App::new(controller, bookmarks),
        Arc::clone(&client),
        Arc::new(guide),
    );

    let mut stdout = std::io::stdout();
    if cli.once {
        runtime.run_once(&mut stdout).await?;
    } else {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        runtime.run_interactive(stdin, &mut stdout).await?;
    }

    let metrics = client.get_metrics().await;
    tracing::info!(
        "GitHub API usage: {} requests, {} failed, {} rate limited, avg {:?}",
        metrics.total_requests,
        metrics.failed_requests,
        metrics.rate_limited_requests,
        metrics.average_response_time()
    );
    for (endpoint, stats) in &metrics.requests_by_endpoint {
        tracing::debug!(
            "{}: {} requests, {:.0}% ok, avg {:?}",
            endpoint,
            stats.request_count,
            stats.success_rate() * 100.0,
            stats.average_response_time()
        );
    }
    if let Some(quota) = metrics.rate_limit {
        tracing::debug!("Search quota remaining: {}/{}", quota.remaining, quota.limit);
    }
    Ok(())
}
