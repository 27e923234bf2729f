use clap::Parser;
use dotenv::dotenv;
use tracing::error;
use tracing_subscriber::EnvFilter;

use github_repo_searching_lib::client::{backend_from_args, run_browse, run_search};
use github_repo_searching_lib::{api, Args, Command, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Args::parse();

    // The terminal front end keeps stdout for results, so it only logs warnings.
    let default_level = match args.command {
        Command::Serve(_) => "info",
        Command::Search { .. } | Command::Browse(_) => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Serve(serve) => {
            let config = ServerConfig::from_args(&serve);
            api::serve(config).await?;
        }
        Command::Search { client, filters } => {
            let backend = backend_from_args(&client)?;
            if let Err(e) = run_search(backend.as_ref(), filters).await {
                error!("Search failed: {}", e);
                std::process::exit(1);
            }
        }
        Command::Browse(client) => {
            let backend = backend_from_args(&client)?;
            run_browse(backend.as_ref()).await?;
        }
    }

    Ok(())
}
