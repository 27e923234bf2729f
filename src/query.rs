use crate::error::SearchError;
use crate::filters::SearchFilters;

/// Builds the upstream `q` parameter from the filter form.
///
/// The free-text term comes first, followed by one `field:value` qualifier per
/// non-empty field in a fixed order, with one `topic:` qualifier per distinct
/// entry of the comma-separated topic list (placed after `forks`). Values are
/// not escaped; malformed predicates surface as upstream errors.
pub fn build_query(filters: &SearchFilters) -> Result<String, SearchError> {
    let mut terms: Vec<String> = Vec::new();

    let text = filters.query.trim();
    if !text.is_empty() {
        terms.push(text.to_string());
    }

    let leading = [
        ("user", &filters.user),
        ("org", &filters.org),
        ("language", &filters.language),
        ("created", &filters.created),
        ("pushed", &filters.pushed),
        ("size", &filters.size),
        ("stars", &filters.stars),
        ("forks", &filters.forks),
    ];
    push_qualifiers(&mut terms, &leading);

    let mut seen: Vec<&str> = Vec::new();
    for topic in filters.topics.split(',').map(str::trim) {
        if topic.is_empty() || seen.contains(&topic) {
            continue;
        }
        seen.push(topic);
        terms.push(format!("topic:{topic}"));
    }

    let trailing = [
        ("license", &filters.license),
        ("is", &filters.is),
        ("archived", &filters.archived),
        ("fork", &filters.fork),
    ];
    push_qualifiers(&mut terms, &trailing);

    if terms.is_empty() {
        return Err(SearchError::MissingQuery);
    }
    Ok(terms.join(" "))
}

fn push_qualifiers(terms: &mut Vec<String>, fields: &[(&str, &String)]) {
    for (name, value) in fields {
        let value = value.trim();
        if !value.is_empty() {
            terms.push(format!("{name}:{value}"));
        }
    }
}
