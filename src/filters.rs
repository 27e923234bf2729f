use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Structured search criteria, one field per form input.
///
/// Every value is passed through to the upstream qualifier syntax as typed;
/// nothing here validates predicates such as `>=100` or `2020-01-01..2021-01-01`.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Free-text search terms.
    #[arg(long, default_value = "")]
    pub query: String,

    /// Repositories owned by this user.
    #[arg(long, default_value = "")]
    pub user: String,

    /// Repositories owned by this organization.
    #[arg(long, default_value = "")]
    pub org: String,

    /// Primary language.
    #[arg(long, default_value = "")]
    pub language: String,

    /// Creation date predicate, e.g. `>2020-01-01`.
    #[arg(long, default_value = "")]
    pub created: String,

    /// Last push date predicate.
    #[arg(long, default_value = "")]
    pub pushed: String,

    /// Size predicate in kilobytes.
    #[arg(long, default_value = "")]
    pub size: String,

    /// Star count predicate, e.g. `>=500`.
    #[arg(long, default_value = "")]
    pub stars: String,

    /// Fork count predicate.
    #[arg(long, default_value = "")]
    pub forks: String,

    /// Comma-separated topic list.
    #[arg(long, default_value = "")]
    pub topics: String,

    /// License keyword, e.g. `mit`.
    #[arg(long, default_value = "")]
    pub license: String,

    /// Visibility, e.g. `public`.
    #[arg(long, default_value = "")]
    pub is: String,

    /// `true` or `false`.
    #[arg(long, default_value = "")]
    pub archived: String,

    /// `true`, `false` or `only`.
    #[arg(long, default_value = "")]
    pub fork: String,

    /// One of `stars`, `forks`, `updated`, `created`; empty for best match.
    #[arg(long, default_value = "")]
    pub sort: String,

    /// `asc` or `desc`.
    #[arg(long, default_value = "desc")]
    pub order: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: String::new(),
            user: String::new(),
            org: String::new(),
            language: String::new(),
            created: String::new(),
            pushed: String::new(),
            size: String::new(),
            stars: String::new(),
            forks: String::new(),
            topics: String::new(),
            license: String::new(),
            is: String::new(),
            archived: String::new(),
            fork: String::new(),
            sort: String::new(),
            order: "desc".to_string(),
        }
    }
}

impl SearchFilters {
    /// Current value of one form input.
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Query => &self.query,
            FilterField::User => &self.user,
            FilterField::Org => &self.org,
            FilterField::Language => &self.language,
            FilterField::Created => &self.created,
            FilterField::Pushed => &self.pushed,
            FilterField::Size => &self.size,
            FilterField::Stars => &self.stars,
            FilterField::Forks => &self.forks,
            FilterField::Topics => &self.topics,
            FilterField::License => &self.license,
            FilterField::Is => &self.is,
            FilterField::Archived => &self.archived,
            FilterField::Fork => &self.fork,
            FilterField::Sort => &self.sort,
            FilterField::Order => &self.order,
        }
    }

    /// Overwrites one form input.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Query => &mut self.query,
            FilterField::User => &mut self.user,
            FilterField::Org => &mut self.org,
            FilterField::Language => &mut self.language,
            FilterField::Created => &mut self.created,
            FilterField::Pushed => &mut self.pushed,
            FilterField::Size => &mut self.size,
            FilterField::Stars => &mut self.stars,
            FilterField::Forks => &mut self.forks,
            FilterField::Topics => &mut self.topics,
            FilterField::License => &mut self.license,
            FilterField::Is => &mut self.is,
            FilterField::Archived => &mut self.archived,
            FilterField::Fork => &mut self.fork,
            FilterField::Sort => &mut self.sort,
            FilterField::Order => &mut self.order,
        };
        *slot = value.into();
    }

    /// The filters with sort and order blanked. Two searches with equal keys
    /// fetch the same result set, only ordered differently.
    pub fn without_sort(&self) -> Self {
        Self {
            sort: String::new(),
            order: String::new(),
            ..self.clone()
        }
    }
}

/// Names of the form inputs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Query,
    User,
    Org,
    Language,
    Created,
    Pushed,
    Size,
    Stars,
    Forks,
    Topics,
    License,
    Is,
    Archived,
    Fork,
    Sort,
    Order,
}

impl FilterField {
    pub const ALL: [FilterField; 16] = [
        Self::Query,
        Self::User,
        Self::Org,
        Self::Language,
        Self::Created,
        Self::Pushed,
        Self::Size,
        Self::Stars,
        Self::Forks,
        Self::Topics,
        Self::License,
        Self::Is,
        Self::Archived,
        Self::Fork,
        Self::Sort,
        Self::Order,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::User => "user",
            Self::Org => "org",
            Self::Language => "language",
            Self::Created => "created",
            Self::Pushed => "pushed",
            Self::Size => "size",
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Topics => "topics",
            Self::License => "license",
            Self::Is => "is",
            Self::Archived => "archived",
            Self::Fork => "fork",
            Self::Sort => "sort",
            Self::Order => "order",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FilterField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
