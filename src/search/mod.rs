//! Fuzzy search over post names
//!
//! The scorer walks a candidate left to right looking for the query's
//! characters in order. Each hit adds `1 / gap`, where `gap` counts the
//! characters since the previous hit (starting at 1). A candidate shorter
//! than the query, or scoring below `threshold * query length`, is dropped.
//! Matching ignores case.

mod debounce;

pub use debounce::Debouncer;

use crate::content::{ParsedPost, PostSummary};

/// Default minimum score per query character
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Something with a name to search on
pub trait Searchable {
    fn search_key(&self) -> &str;
}

impl Searchable for ParsedPost {
    fn search_key(&self) -> &str {
        &self.name
    }
}

impl Searchable for PostSummary {
    fn search_key(&self) -> &str {
        &self.name
    }
}

impl Searchable for String {
    fn search_key(&self) -> &str {
        self
    }
}

impl Searchable for &str {
    fn search_key(&self) -> &str {
        self
    }
}

/// Whether a query counts as empty
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Score `candidate` against `query`, or `None` if it does not qualify
pub fn score(query: &str, candidate: &str, threshold: f64) -> Option<f64> {
    let query: Vec<char> = query.trim().chars().flat_map(char::to_lowercase).collect();
    let candidate: Vec<char> = candidate.chars().flat_map(char::to_lowercase).collect();

    if query.is_empty() || candidate.len() < query.len() {
        return None;
    }

    let mut total = 0.0;
    let mut gap = 1usize;
    let mut next = 0usize;

    for c in &candidate {
        if next == query.len() {
            break;
        }
        if *c == query[next] {
            total += 1.0 / gap as f64;
            gap = 1;
            next += 1;
        } else {
            gap += 1;
        }
    }

    (total >= threshold * query.len() as f64).then_some(total)
}

/// Rank `items` against `query` with the default threshold.
///
/// A blank query returns every item in input order.
pub fn search<'a, T: Searchable>(query: &str, items: &'a [T]) -> Vec<&'a T> {
    search_with_threshold(query, items, DEFAULT_THRESHOLD)
}

/// Rank `items` against `query`, best first; ties keep input order
pub fn search_with_threshold<'a, T: Searchable>(
    query: &str,
    items: &'a [T],
    threshold: f64,
) -> Vec<&'a T> {
    if is_blank(query) {
        return items.iter().collect();
    }

    let mut scored: Vec<(f64, &T)> = items
        .iter()
        .filter_map(|item| score(query, item.search_key(), threshold).map(|s| (s, item)))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}
