use chrono::{DateTime, Utc};
use tracing::debug;

use crate::backend::SearchBackend;
use crate::cache::ResultCache;
use crate::error::SearchError;
use crate::filters::{FilterField, SearchFilters};
use crate::models::{RateLimit, SearchResponse};

/// What `begin_search` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Served from the cache; already on display.
    Cached,
    /// These filters must be fetched and handed back to `complete_search`.
    Fetch(SearchFilters),
}

/// Front-end state for one user session.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    filters: SearchFilters,
    cache: ResultCache,
    loading: bool,
    results: Option<SearchResponse>,
    error: Option<String>,
    status: Option<u16>,
    rate_limit: Option<RateLimit>,
}

impl SearchSession {
    pub fn new(filters: SearchFilters) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn results(&self) -> Option<&SearchResponse> {
        self.results.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn rate_limit(&self) -> Option<&RateLimit> {
        self.rate_limit.as_ref()
    }

    pub fn set_field(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
    }

    /// Changes sort/order and re-sorts the displayed results from the cache
    /// when the cached entry still matches. Returns whether that happened.
    pub fn set_sort(&mut self, sort: &str, order: &str, now: DateTime<Utc>) -> bool {
        self.filters.sort = sort.to_string();
        self.filters.order = order.to_string();

        match self.cache.get(&self.filters, now) {
            Some(hit) => {
                self.results = Some(hit.view(sort, order));
                true
            }
            None => false,
        }
    }

    /// Looks the current filters up in the cache. A hit is displayed at once;
    /// a miss raises the busy flag and hands back what to fetch.
    pub fn begin_search(&mut self, now: DateTime<Utc>) -> SearchPlan {
        if let Some(hit) = self.cache.get(&self.filters, now) {
            debug!("Serving search from cache");
            self.results = Some(hit.view(&self.filters.sort, &self.filters.order));
            self.error = None;
            return SearchPlan::Cached;
        }

        self.loading = true;
        self.error = None;
        SearchPlan::Fetch(self.filters.clone())
    }

    /// Applies the outcome of a fetch started by `begin_search`. Failures
    /// leave the previous results and cache entry in place.
    pub fn complete_search(
        &mut self,
        requested: &SearchFilters,
        outcome: Result<SearchResponse, SearchError>,
        now: DateTime<Utc>,
    ) {
        self.loading = false;

        match outcome {
            Ok(response) => {
                self.status = Some(response.status);
                if response.rate_limit.is_some() {
                    self.rate_limit = response.rate_limit;
                }
                self.cache.put(requested, response, now);
                self.results = self
                    .cache
                    .get(requested, now)
                    .map(|hit| hit.view(&requested.sort, &requested.order));
                self.error = None;
            }
            Err(e) => {
                if !matches!(e, SearchError::Http(_) | SearchError::Decode(_)) {
                    self.status = Some(e.status_code());
                }
                self.error = Some(e.to_string());
            }
        }
    }

    /// Cache first, backend on a miss.
    pub async fn search<B: SearchBackend + ?Sized>(&mut self, backend: &B) {
        match self.begin_search(Utc::now()) {
            SearchPlan::Cached => {}
            SearchPlan::Fetch(filters) => {
                let outcome = backend.fetch(&filters).await;
                self.complete_search(&filters, outcome, Utc::now());
            }
        }
    }

    /// Back to the default form with nothing displayed or cached.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::tests::repo;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    struct FakeBackend {
        outcomes: Mutex<Vec<Result<SearchResponse, SearchError>>>,
        calls: Mutex<Vec<SearchFilters>>,
    }

    impl FakeBackend {
        fn new(outcomes: Vec<Result<SearchResponse, SearchError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchBackend for FakeBackend {
        async fn fetch(&self, filters: &SearchFilters) -> Result<SearchResponse, SearchError> {
            self.calls.lock().unwrap().push(filters.clone());
            self.outcomes.lock().unwrap().remove(0)
        }
    }

    fn ok_response() -> SearchResponse {
        SearchResponse {
            status: 200,
            rate_limit: Some(RateLimit {
                limit: 30,
                remaining: 28,
                reset: 0,
            }),
            total_count: 3,
            incomplete_results: false,
            items: vec![repo(1, 5, 0, 1, 1), repo(2, 50, 0, 1, 1), repo(3, 20, 0, 1, 1)],
            error: None,
        }
    }

    fn ids(session: &SearchSession) -> Vec<u64> {
        session
            .results()
            .map(|r| r.items.iter().map(|i| i.id).collect())
            .unwrap_or_default()
    }

    fn rust_session() -> SearchSession {
        let mut session = SearchSession::default();
        session.set_field(FilterField::Language, "rust");
        session
    }

    #[tokio::test]
    async fn repeated_search_hits_cache() {
        let backend = FakeBackend::new(vec![Ok(ok_response())]);
        let mut session = rust_session();

        session.search(&backend).await;
        session.search(&backend).await;

        assert_eq!(backend.call_count(), 1);
        assert_eq!(session.status(), Some(200));
        assert_eq!(session.rate_limit().map(|r| r.remaining), Some(28));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn sort_change_resorts_without_network() {
        let backend = FakeBackend::new(vec![Ok(ok_response())]);
        let mut session = rust_session();
        session.search(&backend).await;

        assert!(session.set_sort("stars", "desc", Utc::now()));
        assert_eq!(ids(&session), [2, 3, 1]);
        assert!(session.set_sort("stars", "asc", Utc::now()));
        assert_eq!(ids(&session), [1, 3, 2]);

        session.search(&backend).await;
        assert_eq!(backend.call_count(), 1);
        assert_eq!(session.results().unwrap().total_count, 3);
    }

    #[tokio::test]
    async fn filter_change_forces_refetch() {
        let backend = FakeBackend::new(vec![Ok(ok_response()), Ok(ok_response())]);
        let mut session = rust_session();
        session.search(&backend).await;

        session.set_field(FilterField::Stars, ">100");
        session.search(&backend).await;

        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.calls.lock().unwrap()[1].stars, ">100");
    }

    #[test]
    fn stale_entry_forces_refetch() {
        let now = Utc::now();
        let mut session = rust_session();
        let SearchPlan::Fetch(filters) = session.begin_search(now) else {
            panic!("expected a fetch on an empty cache");
        };
        session.complete_search(&filters, Ok(ok_response()), now);

        assert_eq!(session.begin_search(now + Duration::minutes(10)), SearchPlan::Cached);
        assert!(matches!(
            session.begin_search(now + Duration::minutes(31)),
            SearchPlan::Fetch(_)
        ));
        assert!(session.is_loading());
    }

    #[tokio::test]
    async fn failure_keeps_previous_results_and_cache() {
        let backend = FakeBackend::new(vec![
            Ok(ok_response()),
            Err(SearchError::Upstream {
                status: 422,
                message: "Validation Failed".into(),
            }),
        ]);
        let mut session = rust_session();
        session.search(&backend).await;

        session.set_field(FilterField::Stars, "not-a-number");
        session.search(&backend).await;

        assert_eq!(session.error(), Some("Validation Failed"));
        assert_eq!(session.status(), Some(422));
        assert_eq!(ids(&session), [1, 2, 3]);
        assert!(!session.is_loading());

        session.set_field(FilterField::Stars, "");
        session.search(&backend).await;
        assert_eq!(backend.call_count(), 2);
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let backend = FakeBackend::new(vec![Ok(ok_response()), Ok(ok_response())]);
        let mut session = rust_session();
        session.set_field(FilterField::Sort, "stars");
        session.search(&backend).await;

        session.clear();
        assert_eq!(session.filters(), &SearchFilters::default());
        assert!(session.results().is_none());
        assert!(session.status().is_none());

        session.set_field(FilterField::Language, "rust");
        session.set_field(FilterField::Sort, "stars");
        session.search(&backend).await;
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn missing_query_is_reported() {
        let backend = FakeBackend::new(vec![Err(SearchError::MissingQuery)]);
        let mut session = SearchSession::default();
        session.search(&backend).await;

        assert_eq!(session.status(), Some(400));
        assert!(session.error().unwrap().starts_with("Missing query"));
        assert!(session.results().is_none());
    }
}
