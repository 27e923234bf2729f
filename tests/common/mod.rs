//! Shared fake upstream for router-level tests.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use github_repo_searching_lib::{GitHubApi, PageRequest, PageResult, RateLimit, Repository, SearchError};

pub struct FakeGitHub {
    pub page_sizes: Vec<usize>,
    pub fail_with: Option<u16>,
    pub rate_limit_fails: bool,
    pub requests: Mutex<Vec<(String, Option<String>, u32)>>,
}

impl FakeGitHub {
    pub fn new(page_sizes: &[usize]) -> Self {
        FakeGitHub {
            page_sizes: page_sizes.to_vec(),
            fail_with: None,
            rate_limit_fails: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn repository(id: u64, created_day: u32) -> Repository {
    Repository {
        id,
        full_name: format!("octo/repo-{id}"),
        html_url: format!("https://github.com/octo/repo-{id}"),
        description: Some("test repository".to_string()),
        language: Some("Rust".to_string()),
        topics: vec!["cli".to_string()],
        license: Some("MIT License".to_string()),
        created_at: Utc.with_ymd_and_hms(2021, 3, created_day, 12, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        stargazers_count: id * 10,
        forks_count: id,
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn search_repositories(&self, request: &PageRequest<'_>) -> Result<PageResult, SearchError> {
        self.requests.lock().unwrap().push((
            request.query.to_string(),
            request.sort.map(str::to_owned),
            request.page,
        ));

        if let Some(status) = self.fail_with {
            return Err(SearchError::Upstream {
                status,
                message: "Validation Failed".to_string(),
            });
        }

        let size = self
            .page_sizes
            .get(request.page as usize - 1)
            .copied()
            .unwrap_or(0);
        let offset: usize = self.page_sizes.iter().take(request.page as usize - 1).sum();
        let items = (0..size)
            .map(|i| repository((offset + i + 1) as u64, 1 + (i % 28) as u32))
            .collect();

        Ok(PageResult {
            status: 200,
            total_count: self.page_sizes.iter().sum::<usize>() as u64,
            incomplete_results: false,
            items,
        })
    }

    async fn rate_limit(&self) -> Result<RateLimit, SearchError> {
        if self.rate_limit_fails {
            return Err(SearchError::Upstream {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(RateLimit {
            limit: 30,
            remaining: 29,
            reset: 1_700_000_000,
        })
    }
}
