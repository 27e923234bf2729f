use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::backend::SearchBackend;
use crate::config::{clamp_page_limit, PER_PAGE};
use crate::error::SearchError;
use crate::filters::SearchFilters;
use crate::github_client::{GitHubApi, PageRequest};
use crate::models::SearchResponse;
use crate::query::build_query;
use crate::sort::{sort_repositories, SortKey, SortOrder};

/// Walks the search endpoint page by page and accumulates the result set.
#[derive(Clone)]
pub struct GitHubSearcher {
    api: Arc<dyn GitHubApi>,
    max_page_limit: u32,
}

impl GitHubSearcher {
    /// The page ceiling is clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn new(api: Arc<dyn GitHubApi>, max_page_limit: u32) -> Self {
        GitHubSearcher {
            api,
            max_page_limit: clamp_page_limit(max_page_limit),
        }
    }

    /// Fetch pages in order until one comes back short or the page ceiling is
    /// hit. `total_count` and `incomplete_results` come from page 1 only.
    ///
    /// Sorting by `created` is not sent upstream; the accumulated items are
    /// sorted here instead, keeping upstream order between equal timestamps.
    pub async fn search(
        &self,
        query: &str,
        sort: &str,
        order: &str,
    ) -> Result<SearchResponse, SearchError> {
        let sort = sort.trim();
        let sort_locally = sort == "created";
        let server_sort = (!sort.is_empty() && !sort_locally).then_some(sort);

        let mut page: u32 = 1;
        let mut items = Vec::new();
        let mut first_page = None;

        let status = loop {
            debug!("Searching '{}' - page {}", query, page);

            let result = self
                .api
                .search_repositories(&PageRequest {
                    query,
                    sort: server_sort,
                    order,
                    page,
                    per_page: PER_PAGE,
                })
                .await?;

            let status = result.status;
            let received = result.items.len();
            if first_page.is_none() {
                first_page = Some((result.total_count, result.incomplete_results));
            }
            items.extend(result.items);

            if received < PER_PAGE as usize {
                debug!("No more results for '{}' after page {}", query, page);
                break status;
            }

            if page >= self.max_page_limit {
                info!(
                    "Max page limit reached for '{}' (limit: {})",
                    query, self.max_page_limit
                );
                break status;
            }

            page += 1;
        };

        if sort_locally {
            sort_repositories(&mut items, SortKey::Created, SortOrder::parse(order));
        }

        let rate_limit = match self.api.rate_limit().await {
            Ok(limit) => Some(limit),
            Err(e) => {
                warn!("Could not read rate limit status: {}", e);
                None
            }
        };

        let (total_count, incomplete_results) = first_page.unwrap_or_default();
        info!(
            "Collected {} of {} results for '{}'",
            items.len(),
            total_count,
            query
        );

        Ok(SearchResponse {
            status,
            rate_limit,
            total_count,
            incomplete_results,
            items,
            error: None,
        })
    }
}

#[async_trait]
impl SearchBackend for GitHubSearcher {
    async fn fetch(&self, filters: &SearchFilters) -> Result<SearchResponse, SearchError> {
        let query = build_query(filters)?;
        self.search(&query, &filters.sort, &filters.order).await
    }
}
