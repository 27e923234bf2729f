use std::sync::Arc;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Duration;

use crate::args::ClientArgs;
use crate::backend::{BackendClient, SearchBackend};
use crate::config::UpstreamConfig;
use crate::error::SearchError;
use crate::filters::{FilterField, SearchFilters, UnknownField};
use crate::github_client::GitHubClient;
use crate::github_searcher::GitHubSearcher;
use crate::render::{render_filters, render_session};
use crate::session::SearchSession;

const HELP: &str = "\
Commands:
  set FIELD VALUE     fill a filter (query, user, org, language, created, pushed,
                      size, stars, forks, topics, license, is, archived, fork)
  unset FIELD         empty a filter
  sort KEY [ORDER]    stars|forks|updated|created, asc|desc (re-sorts cached results)
  <Enter> | search    run the search
  filters             show the current form
  clear               reset the form and drop cached results
  help                this text
  quit                exit
";

const SORT_PENDING_HINT: &str = "Sort saved; no fresh results to re-sort, press Enter to search.";

/// One line of input to the interactive browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Set(FilterField, String),
    Unset(FilterField),
    Sort { key: String, order: Option<String> },
    Search,
    Filters,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command '{0}', type `help`")]
    Unknown(String),
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" | "search" => Ok(Self::Search),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(CommandError::Usage("set FIELD VALUE"));
                }
                Ok(Self::Set(field.parse()?, value.to_string()))
            }
            "unset" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("unset FIELD"));
                }
                Ok(Self::Unset(rest.parse()?))
            }
            "sort" => {
                let mut words = rest.split_whitespace();
                let key = words.next().unwrap_or_default().to_string();
                let order = words.next().map(str::to_owned);
                Ok(Self::Sort { key, order })
            }
            "filters" => Ok(Self::Filters),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Chooses between a running backend and querying GitHub in-process.
pub fn backend_from_args(args: &ClientArgs) -> Result<Arc<dyn SearchBackend>, SearchError> {
    match &args.server {
        Some(url) => Ok(Arc::new(BackendClient::new(url)?)),
        None => {
            let upstream = UpstreamConfig::from_args(&args.upstream);
            let client = GitHubClient::new(&upstream)?;
            Ok(Arc::new(GitHubSearcher::new(
                Arc::new(client),
                upstream.max_pages,
            )))
        }
    }
}

/// Runs one search and prints the rendered session.
pub async fn run_search(backend: &dyn SearchBackend, filters: SearchFilters) -> Result<(), SearchError> {
    let mut session = SearchSession::new(filters);
    search_with_spinner(&mut session, backend).await;
    print!("{}", render_session(&session));

    match session.error() {
        Some(message) => Err(SearchError::Upstream {
            status: session.status().unwrap_or(500),
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

/// Line-oriented filter form. Reads commands from stdin until `quit` or EOF.
pub async fn run_browse(backend: &dyn SearchBackend) -> std::io::Result<()> {
    let mut session = SearchSession::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type `help` for commands. Press Enter to search.");
    while let Some(line) = lines.next_line().await? {
        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            BrowseCommand::Set(field, value) => session.set_field(field, value),
            BrowseCommand::Unset(field) => session.set_field(field, ""),
            BrowseCommand::Sort { key, order } => {
                print!("{}", apply_sort(&mut session, &key, order, Utc::now()));
            }
            BrowseCommand::Search => {
                search_with_spinner(&mut session, backend).await;
                print!("{}", render_session(&session));
            }
            BrowseCommand::Filters => print!("{}", render_filters(session.filters())),
            BrowseCommand::Clear => {
                session.clear();
                println!("Cleared.");
            }
            BrowseCommand::Help => print!("{HELP}"),
            BrowseCommand::Quit => break,
        }
    }

    Ok(())
}

/// Re-sorts cached results when possible; otherwise only records the choice
/// and says a search is needed.
fn apply_sort(
    session: &mut SearchSession,
    key: &str,
    order: Option<String>,
    now: DateTime<Utc>,
) -> String {
    let order = order.unwrap_or_else(|| session.filters().order.clone());
    if session.set_sort(key, &order, now) {
        render_session(session)
    } else {
        format!("{SORT_PENDING_HINT}\n")
    }
}

async fn search_with_spinner(session: &mut SearchSession, backend: &dyn SearchBackend) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message("Searching…");
    pb.enable_steady_tick(Duration::from_millis(80));

    session.search(backend).await;
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchResponse;
    use crate::sort::tests::repo;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchBackend for CountingBackend {
        async fn fetch(&self, _filters: &SearchFilters) -> Result<SearchResponse, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SearchResponse {
                status: 200,
                rate_limit: None,
                total_count: 2,
                incomplete_results: false,
                items: vec![repo(1, 5, 0, 1, 1), repo(2, 50, 0, 1, 1)],
                error: None,
            })
        }
    }

    fn rust_session() -> SearchSession {
        SearchSession::new(SearchFilters {
            language: "rust".into(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn spinner_search_goes_through_the_cache() {
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
        };
        let mut session = rust_session();

        search_with_spinner(&mut session, &backend).await;
        search_with_spinner(&mut session, &backend).await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.results().map(|r| r.items.len()), Some(2));
        assert!(!session.is_loading());
    }

    #[test]
    fn sort_without_cached_results_asks_for_a_search() {
        let mut session = rust_session();
        let out = apply_sort(&mut session, "stars", Some("asc".into()), Utc::now());

        assert_eq!(out, format!("{SORT_PENDING_HINT}\n"));
        assert_eq!(session.filters().sort, "stars");
        assert_eq!(session.filters().order, "asc");
    }

    #[tokio::test]
    async fn sort_with_cached_results_renders_them() {
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
        };
        let mut session = rust_session();
        search_with_spinner(&mut session, &backend).await;

        let out = apply_sort(&mut session, "stars", None, Utc::now());
        assert!(out.contains("Showing 2 of 2 repositories"));
        assert!(out.find("owner/repo-2").unwrap() < out.find("owner/repo-1").unwrap());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_line_searches() {
        assert_eq!(BrowseCommand::parse(""), Ok(BrowseCommand::Search));
        assert_eq!(BrowseCommand::parse("   "), Ok(BrowseCommand::Search));
        assert_eq!(BrowseCommand::parse("search"), Ok(BrowseCommand::Search));
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            BrowseCommand::parse("set query http client"),
            Ok(BrowseCommand::Set(FilterField::Query, "http client".into()))
        );
        assert_eq!(
            BrowseCommand::parse("set stars >=100"),
            Ok(BrowseCommand::Set(FilterField::Stars, ">=100".into()))
        );
        assert_eq!(
            BrowseCommand::parse("set topics"),
            Ok(BrowseCommand::Set(FilterField::Topics, String::new()))
        );
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(
            BrowseCommand::parse("set owner rust-lang"),
            Err(CommandError::UnknownField(UnknownField("owner".into())))
        );
        assert_eq!(
            BrowseCommand::parse("set"),
            Err(CommandError::Usage("set FIELD VALUE"))
        );
        assert_eq!(
            BrowseCommand::parse("fetch"),
            Err(CommandError::Unknown("fetch".into()))
        );
    }

    #[test]
    fn sort_with_and_without_order() {
        assert_eq!(
            BrowseCommand::parse("sort stars asc"),
            Ok(BrowseCommand::Sort {
                key: "stars".into(),
                order: Some("asc".into())
            })
        );
        assert_eq!(
            BrowseCommand::parse("sort updated"),
            Ok(BrowseCommand::Sort {
                key: "updated".into(),
                order: None
            })
        );
    }

    #[test]
    fn other_verbs() {
        assert_eq!(BrowseCommand::parse("unset language"), Ok(BrowseCommand::Unset(FilterField::Language)));
        assert_eq!(BrowseCommand::parse("CLEAR"), Ok(BrowseCommand::Clear));
        assert_eq!(BrowseCommand::parse("filters"), Ok(BrowseCommand::Filters));
        assert_eq!(BrowseCommand::parse("quit"), Ok(BrowseCommand::Quit));
        assert_eq!(BrowseCommand::parse("?"), Ok(BrowseCommand::Help));
    }
}
