use std::fmt::Write;

use crate::filters::{FilterField, SearchFilters};
use crate::models::{RateLimit, Repository, SearchResponse};
use crate::session::SearchSession;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Language first, then the first topic, then the license name.
pub fn derived_label(repo: &Repository) -> Option<&str> {
    repo.language
        .as_deref()
        .filter(|l| !l.is_empty())
        .or_else(|| repo.topics.iter().map(String::as_str).find(|t| !t.is_empty()))
        .or_else(|| repo.license.as_deref().filter(|l| !l.is_empty()))
}

/// Name, label, link, description, counts and dates of one repository.
pub fn render_card(repo: &Repository) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", repo.full_name);
    if let Some(label) = derived_label(repo) {
        let _ = write!(out, " [{label}]");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", repo.html_url);
    if let Some(description) = repo.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "  {}", description.trim());
    }
    let _ = writeln!(
        out,
        "  ★ {}  ⑂ {}  created {}  updated {}",
        repo.stargazers_count,
        repo.forks_count,
        repo.created_at.format(DATE_FORMAT),
        repo.updated_at.format(DATE_FORMAT),
    );

    out
}

pub fn render_status(status: Option<u16>, rate_limit: Option<&RateLimit>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(status) = status {
        parts.push(format!("HTTP {status}"));
    }
    if let Some(rate) = rate_limit {
        parts.push(format!("rate limit {}/{}", rate.remaining, rate.limit));
    }
    (!parts.is_empty()).then(|| parts.join(" · "))
}

/// Count header followed by one card per item, or the empty-state line.
pub fn render_results(response: &SearchResponse) -> String {
    if response.items.is_empty() {
        return "No repositories found.\n".to_string();
    }

    let mut out = format!(
        "Showing {} of {} repositories",
        response.items.len(),
        response.total_count
    );
    if response.incomplete_results {
        out.push_str(" (results may be incomplete)");
    }
    out.push_str("\n\n");

    for repo in &response.items {
        out.push_str(&render_card(repo));
        out.push('\n');
    }
    out
}

/// Whole-screen view of the session: status line, then loading, error,
/// empty state or the result cards.
pub fn render_session(session: &SearchSession) -> String {
    let mut out = String::new();

    if let Some(status) = render_status(session.status(), session.rate_limit()) {
        out.push_str(&status);
        out.push('\n');
    }

    if session.is_loading() {
        out.push_str("Searching…\n");
        return out;
    }

    if let Some(error) = session.error() {
        let _ = writeln!(out, "Error: {error}");
    }

    if let Some(results) = session.results() {
        out.push_str(&render_results(results));
    }

    out
}

pub fn render_filters(filters: &SearchFilters) -> String {
    let mut out = String::new();
    for field in FilterField::ALL {
        let value = filters.get(field);
        let shown = if value.is_empty() { "-" } else { value };
        let _ = writeln!(out, "{:>9}: {}", field.name(), shown);
    }
    out
}
