//! Post index - every parsed post, built once and read-only afterwards

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::{parse_post, MarkdownRenderer, ParsedPost, PostSummary, RawPost, RenderHooks};
use crate::helpers::post_url;
use crate::search;

/// All posts of the site.
///
/// Posts keep the order they were parsed in. Two posts may share a name;
/// both stay in the index and name lookups resolve to the last one.
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    posts: Vec<ParsedPost>,
    by_name: HashMap<String, usize>,
}

impl PostIndex {
    /// Parse every raw post and index the results
    pub fn build<H: RenderHooks + ?Sized>(
        raw_posts: &[RawPost],
        renderer: &MarkdownRenderer,
        hooks: &H,
    ) -> Self {
        let posts = raw_posts
            .iter()
            .map(|raw| parse_post(raw, renderer, hooks))
            .collect();
        Self::from_posts(posts)
    }

    /// Index already parsed posts
    pub fn from_posts(posts: Vec<ParsedPost>) -> Self {
        let mut by_name = HashMap::with_capacity(posts.len());
        for (i, post) in posts.iter().enumerate() {
            if let Some(previous) = by_name.insert(post.name.clone(), i) {
                let shadowed: &ParsedPost = &posts[previous];
                tracing::warn!(
                    "Duplicate post name {:?} ({} and {}); /blog route resolves to {}",
                    post.name,
                    shadowed.source_id,
                    post.source_id,
                    post.source_id
                );
            }
        }
        Self { posts, by_name }
    }

    pub fn posts(&self) -> &[ParsedPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ParsedPost> {
        self.posts.get(position)
    }

    /// Position of the post answering to `name` (last parsed wins)
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&ParsedPost> {
        self.position(name).and_then(|i| self.posts.get(i))
    }

    /// Names carried by more than one post, in first-seen order
    pub fn duplicates(&self) -> Vec<&str> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for post in &self.posts {
            *counts.entry(post.name.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect()
    }

    /// Newest first; posts without a valid date go last
    pub fn sorted_by_date(&self) -> Vec<&ParsedPost> {
        let mut sorted: Vec<&ParsedPost> = self.posts.iter().collect();
        sorted.sort_by(|a, b| compare_by_date(a, b));
        sorted
    }

    /// Fuzzy search on post names; an empty query lists by date
    pub fn search(&self, query: &str, threshold: f64) -> Vec<&ParsedPost> {
        if search::is_blank(query) {
            return self.sorted_by_date();
        }
        search::search_with_threshold(query, &self.posts, threshold)
    }

    /// Topics with their post counts, in first-seen order
    pub fn topics(&self) -> IndexMap<&str, usize> {
        let mut topics: IndexMap<&str, usize> = IndexMap::new();
        for post in &self.posts {
            for topic in &post.metadata.topics {
                *topics.entry(topic.as_str()).or_insert(0) += 1;
            }
        }
        topics
    }

    /// Listing view of posts, newest first
    pub fn summaries(&self, root: &str) -> Vec<PostSummary> {
        self.sorted_by_date()
            .into_iter()
            .map(|post| summarize(post, root))
            .collect()
    }
}

/// Listing view of one post
pub fn summarize(post: &ParsedPost, root: &str) -> PostSummary {
    PostSummary {
        name: post.name.clone(),
        date: post.metadata.date.clone(),
        topics: post.metadata.topics.clone(),
        path: post_url(root, &post.name),
    }
}

/// Order two posts newest first by their `dd/mm/yyyy` dates
pub fn compare_by_date(a: &ParsedPost, b: &ParsedPost) -> Ordering {
    match (a.metadata.parsed_date(), b.metadata.parsed_date()) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PlainHooks;

    fn raw(id: &str, date: &str, title: &str) -> RawPost {
        RawPost::new(
            id,
            format!("---\ndate: {}\ntopics: t-{}\n---\n# {}\n", date, id, title),
        )
    }

    fn index(raws: &[RawPost]) -> PostIndex {
        PostIndex::build(raws, &MarkdownRenderer::new(), &PlainHooks)
    }

    #[test]
    fn test_build_keeps_every_post() {
        let idx = index(&[
            raw("a", "01/01/2023", "Alpha"),
            raw("b", "01/01/2024", "Beta"),
        ]);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.posts()[0].name, "Alpha");
        assert_eq!(idx.find("Beta").unwrap().source_id, "b");
        assert!(idx.find("Gamma").is_none());
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let idx = index(&[
            raw("first", "01/01/2023", "Same"),
            raw("other", "02/01/2023", "Other"),
            raw("second", "03/01/2023", "Same"),
        ]);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.find("Same").unwrap().source_id, "second");
        assert_eq!(idx.position("Same"), Some(2));
        assert_eq!(idx.duplicates(), vec!["Same"]);
    }

    #[test]
    fn test_sorted_by_date() {
        let idx = index(&[
            raw("old", "31/12/2022", "Old"),
            raw("undated", "", "Undated"),
            raw("new", "01/02/2024", "New"),
            raw("mid", "15/01/2024", "Mid"),
        ]);
        let names: Vec<_> = idx.sorted_by_date().iter().map(|p| p.name.as_str()).collect();
        // "undated" has no front-matter at all, so it sorts last
        assert_eq!(names, vec!["New", "Mid", "Old", "Undated"]);
    }

    #[test]
    fn test_search_empty_query_uses_date_order() {
        let idx = index(&[
            raw("a", "01/01/2020", "Alpha"),
            raw("b", "01/01/2021", "Beta"),
        ]);
        let names: Vec<_> = idx.search("", 0.5).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
        assert_eq!(idx.search("  ", 0.5).len(), 2);
    }

    #[test]
    fn test_search_ranks_by_name() {
        let idx = index(&[
            raw("a", "01/01/2020", "Sudoku Solver"),
            raw("b", "01/01/2021", "Maze Generator"),
            raw("c", "01/01/2022", "Eight Queens"),
        ]);
        let names: Vec<_> = idx.search("maze", 0.5).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Maze Generator"]);
    }

    #[test]
    fn test_topics_and_summaries() {
        let idx = index(&[
            raw("a", "01/01/2020", "Alpha Post"),
            raw("b", "01/01/2021", "Beta"),
        ]);
        let topics: Vec<_> = idx.topics().into_iter().collect();
        assert_eq!(topics, vec![("t-a", 1), ("t-b", 1)]);

        let summaries = idx.summaries("/");
        assert_eq!(summaries[0].name, "Beta");
        assert_eq!(summaries[1].path, "/blog/Alpha%20Post");
        assert_eq!(summaries[1].date, "01/01/2020");
    }
}
