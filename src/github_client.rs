use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::SearchError;
use crate::models::{PageResult, RateLimit, UpstreamRateLimit, UpstreamSearchPage};

/// One page request against the repository search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub query: &'a str,
    /// Server-side sort key; `None` leaves upstream on best match.
    pub sort: Option<&'a str>,
    pub order: &'a str,
    pub page: u32,
    pub per_page: u32,
}

/// The slice of the GitHub REST API the pager depends on.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn search_repositories(&self, request: &PageRequest<'_>) -> Result<PageResult, SearchError>;

    async fn rate_limit(&self) -> Result<RateLimit, SearchError>;
}

pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(concat!("github-repo-searching/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubClient {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn search_repositories(&self, request: &PageRequest<'_>) -> Result<PageResult, SearchError> {
        let mut params: Vec<(&str, String)> = vec![
            ("q", request.query.to_string()),
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
        ];
        if let Some(sort) = request.sort {
            params.push(("sort", sort.to_string()));
            if !request.order.trim().is_empty() {
                params.push(("order", request.order.trim().to_string()));
            }
        }

        debug!("Requesting search page {} for '{}'", request.page, request.query);
        let response = self.get("/search/repositories").query(&params).send().await?;

        let status = response.status();
        if let Some(quota) = rate_limit_from_headers(response.headers()) {
            debug!("Search quota: {}/{}", quota.remaining, quota.limit);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::from_upstream_body(status.as_u16(), &body));
        }

        let body = response.text().await?;
        let page: UpstreamSearchPage = serde_json::from_str(&body)?;

        Ok(PageResult {
            status: status.as_u16(),
            total_count: page.total_count,
            incomplete_results: page.incomplete_results,
            items: page.items.into_iter().map(Into::into).collect(),
        })
    }

    async fn rate_limit(&self) -> Result<RateLimit, SearchError> {
        let response = self.get("/rate_limit").send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::from_upstream_body(status.as_u16(), &body));
        }

        let body = response.text().await?;
        let parsed: UpstreamRateLimit = serde_json::from_str(&body)?;
        parsed.into_search_limit().ok_or_else(|| SearchError::Upstream {
            status: status.as_u16(),
            message: "rate limit response carried no quota".to_string(),
        })
    }
}

/// Reads the `X-RateLimit-*` headers attached to every API response.
pub fn rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimit> {
    let read = |name: &str| headers.get(name)?.to_str().ok()?.trim().parse::<i64>().ok();

    Some(RateLimit {
        limit: u32::try_from(read("X-RateLimit-Limit")?).ok()?,
        remaining: u32::try_from(read("X-RateLimit-Remaining")?).ok()?,
        reset: read("X-RateLimit-Reset")?,
    })
}
