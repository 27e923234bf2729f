//! # GitHub Repo Searching
//!
//! Search GitHub repositories with structured filters. A thin HTTP proxy turns
//! the filter form into a search query, walks the result pages and trims the
//! payload; a terminal front end caches the last result set so that changing
//! only the sort order never costs a network round trip.
//!
//! ## Main Components
//!
//! - [`build_query`]: maps [`SearchFilters`] to the upstream `q` string
//! - [`GitHubSearcher`]: the pager, the only component doing upstream I/O
//! - [`ResultCache`]: single-slot cache with a 30 minute freshness window
//! - [`SearchSession`]: front-end state (filters, cache, busy flag, last status)
//! - [`api::router`]: the `GET /api/search` endpoint
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use github_repo_searching_lib::{
//!     GitHubClient, GitHubSearcher, SearchFilters, SearchSession, UpstreamConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = UpstreamConfig {
//!         api_url: "https://api.github.com".to_string(),
//!         token: std::env::var("GITHUB_TOKEN").ok(),
//!         max_pages: 5,
//!     };
//!     let searcher = GitHubSearcher::new(Arc::new(GitHubClient::new(&config)?), config.max_pages);
//!
//!     let mut session = SearchSession::new(SearchFilters {
//!         user: "torvalds".to_string(),
//!         language: "c".to_string(),
//!         ..Default::default()
//!     });
//!     session.search(&searcher).await;
//!
//!     // Served from the cache, no second request.
//!     session.set_sort("stars", "asc", chrono::Utc::now());
//!     Ok(())
//! }
//! ```

pub mod api;
mod args;
mod backend;
mod cache;
pub mod client;
mod config;
mod error;
mod filters;
mod github_client;
mod github_searcher;
mod models;
mod query;
pub mod render;
mod session;
mod sort;

pub use crate::args::{Args, ClientArgs, Command, ServeArgs, UpstreamArgs};
pub use crate::backend::{BackendClient, SearchBackend};
pub use crate::cache::{CacheEntry, CachedResult, ResultCache};
pub use crate::config::{ServerConfig, UpstreamConfig, FRESHNESS_WINDOW_MINUTES, PER_PAGE};
pub use crate::error::SearchError;
pub use crate::filters::{FilterField, SearchFilters};
pub use crate::github_client::{GitHubApi, GitHubClient, PageRequest};
pub use crate::github_searcher::GitHubSearcher;
pub use crate::models::{PageResult, RateLimit, Repository, SearchResponse};
pub use crate::query::build_query;
pub use crate::session::{SearchPlan, SearchSession};
pub use crate::sort::{sort_repositories, SortKey, SortOrder};
