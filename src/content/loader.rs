//! Content loader - reads posts from the posts directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{ContentError, MarkdownRenderer, PostIndex, RawPost, SiteHooks};
use crate::Folio;

/// Loads and renders posts
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
    hooks: SiteHooks,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            renderer: MarkdownRenderer::new(),
            hooks: SiteHooks::new(&folio.config),
        }
    }

    /// Read every Markdown file under the posts directory.
    ///
    /// Files that cannot be read are logged and skipped.
    pub fn load_raw_posts(&self) -> Result<Vec<RawPost>> {
        let posts_dir = &self.folio.posts_dir;
        if !posts_dir.exists() {
            tracing::info!("No posts directory at {:?}", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match load_raw_post(path) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        tracing::warn!("Skipping post: {}", e);
                    }
                }
            }
        }

        Ok(posts)
    }

    /// Load, parse and index all posts
    pub fn load_index(&self) -> Result<PostIndex> {
        let raw_posts = self.load_raw_posts()?;
        let index = PostIndex::build(&raw_posts, &self.renderer, &self.hooks);
        tracing::info!("Loaded {} posts", index.len());
        Ok(index)
    }
}

/// Read a single post file
pub fn load_raw_post(path: &Path) -> Result<RawPost, ContentError> {
    let source_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ContentError::NoName(path.to_path_buf()))?
        .to_string();

    let bytes = fs::read(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw_text = String::from_utf8(bytes).map_err(|_| ContentError::NotUtf8 {
        path: path.to_path_buf(),
    })?;

    tracing::debug!("Read post {} from {:?}", source_id, path);
    Ok(RawPost::new(source_id, raw_text))
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site_with_posts(files: &[(&str, &[u8])]) -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("posts");
        fs::create_dir_all(posts.join("nested")).unwrap();
        for (name, content) in files {
            fs::write(posts.join(name), content).unwrap();
        }
        let mut config = SiteConfig::default();
        config.math.enable = false;
        let folio = Folio::with_config(dir.path(), config);
        (dir, folio)
    }

    #[test]
    fn test_load_raw_posts() {
        let (_dir, folio) = site_with_posts(&[
            ("b.md", b"# B"),
            ("a.markdown", b"# A"),
            ("nested/c.md", b"# C"),
            ("image.png", b"\x89PNG"),
            ("broken.md", b"\xff\xfe# not utf8"),
        ]);
        let loader = ContentLoader::new(&folio);
        let posts = loader.load_raw_posts().unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.source_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_posts_dir() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default());
        let index = ContentLoader::new(&folio).load_index().unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_load_index() {
        let (_dir, folio) = site_with_posts(&[(
            "hello.md",
            b"---\ndate: 01/02/2024\ntopics: a b\n---\n# Hello\n\n![x](../public/blog/x.png)\n",
        )]);
        let index = ContentLoader::new(&folio).load_index().unwrap();
        let post = index.find("Hello").unwrap();
        assert_eq!(post.metadata.topics, vec!["a", "b"]);
        assert!(post.html.contains(r#"src="x.png""#));
    }

    #[test]
    fn test_not_utf8_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, b"\xff\xff").unwrap();
        assert!(matches!(
            load_raw_post(&path),
            Err(ContentError::NotUtf8 { .. })
        ));
    }
}
