//! Route table - maps URL paths to pages and posts
//!
//! Built once from the post index and never modified afterwards.

use indexmap::IndexMap;
use serde::Serialize;

use crate::content::PostIndex;
use crate::helpers::{decode_url, url_for};

/// Top-level pages of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageKind {
    Home,
    Blog,
    Project,
}

impl PageKind {
    /// Every page, in no particular order
    pub const ALL: [PageKind; 3] = [PageKind::Project, PageKind::Home, PageKind::Blog];

    pub fn name(self) -> &'static str {
        match self {
            PageKind::Home => "Home",
            PageKind::Blog => "Blog",
            PageKind::Project => "Project",
        }
    }

    /// Path relative to the site root
    pub fn path(self) -> String {
        match self {
            PageKind::Home => "/".to_string(),
            other => format!("/{}", other.name().to_lowercase()),
        }
    }

    /// Position in the navigation; unranked pages come after ranked ones
    fn rank(self) -> u32 {
        match self {
            PageKind::Home => 0,
            PageKind::Blog => 1,
            _ => 100,
        }
    }
}

/// What a path resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Page(PageKind),
    /// Position of the post in the index
    Post(usize),
}

/// A navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: String,
    pub path: String,
}

/// Immutable path → route mapping
#[derive(Debug, Clone)]
pub struct RouteTable {
    root: String,
    pages: Vec<PageKind>,
    entries: IndexMap<String, Route>,
}

impl RouteTable {
    /// Register every page and one route per post name.
    ///
    /// When two posts share a name the one parsed last owns the route.
    pub fn new(root: &str, index: &PostIndex) -> Self {
        let mut pages = PageKind::ALL.to_vec();
        pages.sort_by_key(|page| page.rank());

        let mut entries = IndexMap::new();
        for page in &pages {
            entries.insert(page.path(), Route::Page(*page));
        }

        for (position, post) in index.posts().iter().enumerate() {
            entries.insert(format!("/blog/{}", post.name), Route::Post(position));
        }

        Self {
            root: root.to_string(),
            pages,
            entries,
        }
    }

    /// Resolve a request path (with or without the site root)
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let key = self.normalize(path)?;
        self.entries.get(&key).copied()
    }

    /// Registered paths (relative to the root, decoded) with their routes
    pub fn entries(&self) -> impl Iterator<Item = (&str, Route)> {
        self.entries.iter().map(|(path, route)| (path.as_str(), *route))
    }

    /// Header navigation, in page order
    pub fn nav(&self) -> Vec<NavItem> {
        self.pages
            .iter()
            .map(|page| NavItem {
                name: page.name().to_string(),
                path: url_for(&self.root, &page.path()),
            })
            .collect()
    }

    /// Suffixes are trimmed before decoding: an encoded `%2F` or `%2E`
    /// belongs to a post name.
    fn normalize(&self, path: &str) -> Option<String> {
        let root = self.root.trim_end_matches('/');
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = if root.is_empty() {
            path
        } else {
            path.strip_prefix(root)?
        };

        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".html").unwrap_or(path);

        let mut key = decode_url(path);
        if key.is_empty() || key == "/index" || key == "index" {
            return Some("/".to_string());
        }
        if !key.starts_with('/') {
            key.insert(0, '/');
        }
        Some(key)
    }
}
