use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::models::SearchResponse;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Every filter was empty, so there is nothing to send upstream.
    #[error("Missing query: provide search text or at least one filter")]
    MissingQuery,

    /// Non-success answer from the upstream service (or from the proxy, when
    /// seen from the client side). The status is forwarded as-is.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::MissingQuery => 400,
            SearchError::Upstream { status, .. } => *status,
            SearchError::Http(_) | SearchError::Decode(_) => 500,
        }
    }

    /// Builds an upstream error from a failed response body, preferring the
    /// `message` field of a JSON error document.
    pub fn from_upstream_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_owned)
            })
            .or_else(|| {
                StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| format!("upstream returned status {status}"));

        SearchError::Upstream { status, message }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        match &self {
            SearchError::MissingQuery => {}
            SearchError::Upstream { status, message } => {
                warn!("Upstream error {}: {}", status, message);
            }
            SearchError::Http(_) | SearchError::Decode(_) => {
                error!("Search failed: {}", self);
            }
        }

        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = SearchResponse::failure(status.as_u16(), self.to_string());
        (status, Json(body)).into_response()
    }
}
