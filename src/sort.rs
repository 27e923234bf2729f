use std::cmp::Ordering;

use crate::models::Repository;

/// Sort keys that can be applied to an in-memory result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Stars,
    Forks,
    Updated,
    Created,
}

impl SortKey {
    /// Returns `None` for keys with no local comparator (e.g. best match).
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "stars" => Some(Self::Stars),
            "forks" => Some(Self::Forks),
            "updated" => Some(Self::Updated),
            "created" => Some(Self::Created),
            _ => None,
        }
    }

    fn compare(self, a: &Repository, b: &Repository) -> Ordering {
        match self {
            Self::Stars => a.stargazers_count.cmp(&b.stargazers_count),
            Self::Forks => a.forks_count.cmp(&b.forks_count),
            Self::Updated => a.updated_at.cmp(&b.updated_at),
            Self::Created => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `asc` is descending.
    pub fn parse(order: &str) -> Self {
        if order.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Stable sort: equal keys keep their incoming order in both directions.
pub fn sort_repositories(items: &mut [Repository], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Asc => items.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Desc => items.sort_by(|a, b| key.compare(b, a)),
    }
}
