use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trimmed projection of an upstream repository record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub license: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub stargazers_count: u64,
    pub forks_count: u64,
}

/// Quota snapshot as reported by the upstream `rate_limit` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the quota resets.
    pub reset: i64,
}

/// Body of `GET /api/search`, success and failure alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: u16,
    pub rate_limit: Option<RateLimit>,
    pub total_count: u64,
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<Repository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            rate_limit: None,
            total_count: 0,
            incomplete_results: false,
            items: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// One page of upstream search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub status: u16,
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

// Upstream wire shapes. Only the fields the projection needs are kept.

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamSearchPage {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<UpstreamRepository>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamRepository {
    id: u64,
    full_name: String,
    html_url: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    license: Option<UpstreamLicense>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

#[derive(Debug, Deserialize)]
struct UpstreamLicense {
    name: Option<String>,
}

impl From<UpstreamRepository> for Repository {
    fn from(repo: UpstreamRepository) -> Self {
        Self {
            id: repo.id,
            full_name: repo.full_name,
            html_url: repo.html_url,
            description: repo.description,
            language: repo.language,
            topics: repo.topics,
            license: repo.license.and_then(|l| l.name),
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamRateLimit {
    #[serde(default)]
    pub resources: Option<UpstreamRateResources>,
    #[serde(default)]
    pub rate: Option<RateLimit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamRateResources {
    #[serde(default)]
    pub search: Option<RateLimit>,
}

impl UpstreamRateLimit {
    /// Prefers the search quota, which is metered separately from the core one.
    pub fn into_search_limit(self) -> Option<RateLimit> {
        self.resources.and_then(|r| r.search).or(self.rate)
    }
}
