use std::env;

use tracing::{info, warn};

use crate::args::{ServeArgs, UpstreamArgs};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Page size requested from upstream; also the exhaustion threshold.
pub const PER_PAGE: u32 = 100;

/// GitHub serves only the first 1000 results of any search.
pub const MAX_SEARCH_RESULTS: u32 = 1000;

/// Pages past this one are rejected upstream with a 422.
pub const MAX_PAGE_LIMIT: u32 = MAX_SEARCH_RESULTS / PER_PAGE;

/// How long a cached result set stays usable.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 30;

/// Settings for talking to the GitHub API, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub max_pages: u32,
}

impl UpstreamConfig {
    /// Flags win over the environment; a blank token means anonymous access.
    pub fn from_args(args: &UpstreamArgs) -> Self {
        let token = match &args.token {
            Some(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
            _ => match env::var("GITHUB_TOKEN") {
                Ok(token) if !token.trim().is_empty() => Some(token.trim().to_string()),
                _ => {
                    warn!("No GitHub token configured, using unauthenticated rate limits");
                    None
                }
            },
        };

        UpstreamConfig {
            api_url: args.api_url.clone(),
            token,
            max_pages: clamp_page_limit(args.max_pages),
        }
    }
}

/// Keeps the page ceiling within what upstream will actually serve.
pub fn clamp_page_limit(max_pages: u32) -> u32 {
    if max_pages > MAX_PAGE_LIMIT {
        warn!(
            "--max-pages {} exceeds the {} result search cap, using {}",
            max_pages, MAX_SEARCH_RESULTS, MAX_PAGE_LIMIT
        );
    }
    max_pages.clamp(1, MAX_PAGE_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub upstream: UpstreamConfig,
}

impl ServerConfig {
    pub fn from_args(args: &ServeArgs) -> Self {
        let port = args
            .port
            .or_else(|| env::var("PORT").ok().and_then(|p| p.trim().parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let upstream = UpstreamConfig::from_args(&args.upstream);
        info!(
            "Configured port {} against {} (max {} pages)",
            port, upstream.api_url, upstream.max_pages
        );

        ServerConfig { port, upstream }
    }
}
