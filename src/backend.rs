use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::SearchError;
use crate::filters::SearchFilters;
use crate::models::SearchResponse;

/// Where the front end gets a fresh result set on a cache miss.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn fetch(&self, filters: &SearchFilters) -> Result<SearchResponse, SearchError>;
}

/// Talks to a running `serve` instance over HTTP.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(concat!("github-repo-searching/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(BackendClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/api/search", self.base_url)
    }
}

#[async_trait]
impl SearchBackend for BackendClient {
    async fn fetch(&self, filters: &SearchFilters) -> Result<SearchResponse, SearchError> {
        let url = self.search_url();
        debug!("Requesting {}", url);

        let response = self.client.get(&url).query(filters).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::from_upstream_body(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_joins_base() {
        let client = BackendClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.search_url(), "http://localhost:3000/api/search");
    }
}
