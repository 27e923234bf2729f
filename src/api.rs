use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::backend::SearchBackend;
use crate::config::ServerConfig;
use crate::error::SearchError;
use crate::filters::SearchFilters;
use crate::github_client::{GitHubApi, GitHubClient};
use crate::github_searcher::GitHubSearcher;
use crate::models::SearchResponse;

#[derive(Clone)]
pub struct AppState {
    pub searcher: GitHubSearcher,
}

impl AppState {
    pub fn new(api: Arc<dyn GitHubApi>, max_pages: u32) -> Arc<Self> {
        Arc::new(AppState {
            searcher: GitHubSearcher::new(api, max_pages),
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Arc<Self>, SearchError> {
        let client = GitHubClient::new(&config.upstream)?;
        Ok(Self::new(Arc::new(client), config.upstream.max_pages))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/search", get(search_repositories))
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

pub async fn search_repositories(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<SearchFilters>,
) -> Result<Json<SearchResponse>, SearchError> {
    let response = state.searcher.fetch(&filters).await?;
    Ok(Json(response))
}

/// Binds the listener and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server keeps
/// running instead of shutting down immediately.
async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
