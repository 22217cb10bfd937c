//! The assembled site: configuration, post index, routes and templates.
//!
//! A `Site` is built once at startup and only read afterwards; the server
//! shares it between requests behind an `Arc`.

use anyhow::Result;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::loader::ContentLoader;
use crate::content::{summarize, ParsedPost, PostIndex, PostSummary};
use crate::helpers::{excerpt, url_for};
use crate::routes::{PageKind, Route, RouteTable};
use crate::templates::{
    BlogData, HomeData, PostPageData, ProjectData, SiteData, TemplateRenderer,
};
use crate::Folio;

/// Number of posts listed on the home page
const RECENT_POSTS: usize = 3;

/// Length of the meta description taken from a post body
const EXCERPT_LENGTH: usize = 160;

/// Read-only site state
pub struct Site {
    config: SiteConfig,
    index: PostIndex,
    routes: RouteTable,
    templates: TemplateRenderer,
}

impl Site {
    /// Assemble a site from an already built index
    pub fn new(config: SiteConfig, index: PostIndex) -> Result<Self> {
        let routes = RouteTable::new(&config.root, &index);
        let templates = TemplateRenderer::new()?;
        Ok(Self {
            config,
            index,
            routes,
            templates,
        })
    }

    /// Load every post of `folio` and assemble the site
    pub fn load(folio: &Folio) -> Result<Self> {
        let index = ContentLoader::new(folio).load_index()?;
        Self::new(folio.config.clone(), index)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn index(&self) -> &PostIndex {
        &self.index
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Render the page at `path`, or `None` if nothing is routed there
    pub fn render_path(&self, path: &str, query: Option<&str>) -> Result<Option<String>> {
        match self.routes.resolve(path) {
            Some(route) => self.render_route(route, query).map(Some),
            None => Ok(None),
        }
    }

    /// Render a resolved route
    pub fn render_route(&self, route: Route, query: Option<&str>) -> Result<String> {
        match route {
            Route::Page(page) => self.render_page(page, query.unwrap_or_default()),
            Route::Post(position) => match self.index.get(position) {
                Some(post) => self.render_post(post),
                None => anyhow::bail!("Route points at missing post #{}", position),
            },
        }
    }

    /// Render one of the top-level pages
    pub fn render_page(&self, page: PageKind, query: &str) -> Result<String> {
        let mut context = self.base_context(page.name());

        let template = match page {
            PageKind::Home => {
                let recent = self
                    .index
                    .sorted_by_date()
                    .into_iter()
                    .take(RECENT_POSTS)
                    .map(|post| summarize(post, &self.config.root))
                    .collect();
                context.insert(
                    "home",
                    &HomeData {
                        links: self.config.links.clone(),
                        recent,
                    },
                );
                "home.html"
            }
            PageKind::Blog => {
                context.insert(
                    "blog",
                    &BlogData {
                        query: query.to_string(),
                        posts: self.search(query),
                    },
                );
                "blog.html"
            }
            PageKind::Project => {
                context.insert(
                    "project",
                    &ProjectData {
                        projects: self.config.projects.clone(),
                    },
                );
                "project.html"
            }
        };

        self.templates.render(template, &context)
    }

    /// Render a post page
    pub fn render_post(&self, post: &ParsedPost) -> Result<String> {
        let mut context = self.base_context(&post.name);
        context.insert(
            "post",
            &PostPageData {
                name: post.name.clone(),
                date: post.metadata.date.clone(),
                topics: post.metadata.topics.clone(),
                html: post.html.clone(),
                excerpt: excerpt(&post.html, EXCERPT_LENGTH),
                anchors: post.anchors.clone(),
            },
        );
        self.templates.render("post.html", &context)
    }

    /// Render the page shown for unrouted paths
    pub fn render_not_found(&self, path: &str) -> Result<String> {
        let mut context = self.base_context("Not Found");
        context.insert("path", path);
        self.templates.render("not_found.html", &context)
    }

    /// Fuzzy search on post names; a blank query lists newest first
    pub fn search(&self, query: &str) -> Vec<PostSummary> {
        self.index
            .search(query, self.config.search.threshold)
            .into_iter()
            .map(|post| summarize(post, &self.config.root))
            .collect()
    }

    /// Every post summary, newest first
    pub fn search_index(&self) -> Vec<PostSummary> {
        self.index.summaries(&self.config.root)
    }

    fn base_context(&self, page_title: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("page_title", page_title);
        context
    }

    fn site_data(&self) -> SiteData {
        let root = url_for(&self.config.root, "");
        SiteData {
            title: self.config.title.clone(),
            author: self.config.author.clone(),
            description: self.config.description.clone(),
            url: self.config.url.clone(),
            nav: self.routes.nav(),
            math: self.config.math.enable,
            blog_path: url_for(&root, "blog"),
            search_endpoint: url_for(&root, "api/search"),
            debounce_ms: self.config.search.debounce_ms,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MarkdownRenderer, PlainHooks, RawPost};

    fn site() -> Site {
        let raws = vec![
            RawPost::new(
                "queens",
                "---\ndate: 10/10/2023\ntopics: search python\n---\n# Eight Queens\n\n## Hill climbing\n\nBody.\n",
            ),
            RawPost::new(
                "maze",
                "---\ndate: 01/03/2024\ntopics: python\n---\n# Maze Generator\n\nText.\n",
            ),
        ];
        let index = PostIndex::build(&raws, &MarkdownRenderer::new(), &PlainHooks);
        let mut config = SiteConfig::default();
        config.title = "Folio".to_string();
        config.projects.push(crate::config::ProjectConfig {
            name: "Sudoku".to_string(),
            description: "Solver".to_string(),
            url: Some("https://example.com/sudoku".to_string()),
            topics: vec!["python".to_string()],
        });
        Site::new(config, index).unwrap()
    }

    #[test]
    fn test_render_home() {
        let html = site().render_path("/", None).unwrap().unwrap();
        assert!(html.contains("<title>Home | Folio</title>"));
        assert!(html.contains("Maze Generator"));
        assert!(html.contains("app-nav-link"));
    }

    #[test]
    fn test_render_blog_lists_newest_first() {
        let html = site().render_path("/blog", None).unwrap().unwrap();
        let maze = html.find("Maze Generator").unwrap();
        let queens = html.find("Eight Queens").unwrap();
        assert!(maze < queens);
    }

    #[test]
    fn test_render_blog_with_query() {
        let html = site().render_path("/blog", Some("queens")).unwrap().unwrap();
        assert!(html.contains("Eight Queens"));
        assert!(!html.contains("Maze Generator"));
        assert!(html.contains(r#"value="queens""#));
    }

    #[test]
    fn test_render_post() {
        let html = site()
            .render_path("/blog/Eight%20Queens", None)
            .unwrap()
            .unwrap();
        assert!(html.contains("<title>Eight Queens | Folio</title>"));
        assert!(html.contains(r#"<h2 id="hill-climbing---0">Hill climbing</h2>"#));
        assert!(html.contains(r##"href="#hill-climbing---0""##));
        assert!(html.contains("October 10, 2023"));
    }

    #[test]
    fn test_render_project() {
        let html = site().render_path("/project", None).unwrap().unwrap();
        assert!(html.contains("Sudoku"));
        assert!(html.contains("Solver"));
    }

    #[test]
    fn test_unknown_path() {
        let site = site();
        assert!(site.render_path("/nope", None).unwrap().is_none());
        let html = site.render_not_found("/nope").unwrap();
        assert!(html.contains("Not Found"));
    }

    #[test]
    fn test_search() {
        let site = site();
        let results = site.search("maze");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/blog/Maze%20Generator");
        assert_eq!(site.search("").len(), 2);
        assert_eq!(site.search_index()[0].name, "Maze Generator");
    }
}
