use clap::{Parser, Subcommand};

use crate::filters::SearchFilters;

/// GitHub repository search with structured filters, served through a thin
/// caching proxy and browsable from the terminal.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Search GitHub repositories with structured filters. Run `serve` for the HTTP \
                  proxy, or `search`/`browse` for the terminal front end."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP backend exposing `GET /api/search`.
    Serve(ServeArgs),

    /// Run a single search and print the results.
    Search {
        #[command(flatten)]
        client: ClientArgs,

        #[command(flatten)]
        filters: SearchFilters,
    },

    /// Interactive filter form with cached re-sorting.
    Browse(ClientArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (falls back to PORT, then 3000).
    #[clap(short, long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

#[derive(clap::Args, Debug)]
pub struct ClientArgs {
    /// Base URL of a running backend, e.g. http://localhost:3000.
    /// Without it, GitHub is queried directly from this process.
    #[clap(short, long)]
    pub server: Option<String>,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

#[derive(clap::Args, Debug)]
pub struct UpstreamArgs {
    /// GitHub API token for authentication (falls back to GITHUB_TOKEN).
    #[clap(short, long)]
    pub token: Option<String>,

    /// Maximum number of pages to retrieve per search.
    /// Each page contains up to 100 results.
    #[clap(long, value_name = "NUM", default_value_t = crate::config::DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// GitHub REST API base URL.
    #[clap(long, default_value = crate::config::DEFAULT_API_URL)]
    pub api_url: String,
}
