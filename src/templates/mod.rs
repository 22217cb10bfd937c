//! Page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{LinkConfig, ProjectConfig};
use crate::content::{HeadingAnchor, PostSummary, DATE_FORMAT};
use crate::routes::NavItem;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("project.html", include_str!("site/project.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/topics.html",
                include_str!("site/partials/topics.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: reformat a `dd/mm/yyyy` date
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%B %d, %Y".to_string(),
    };

    match chrono::NaiveDate::parse_from_str(&s, DATE_FORMAT) {
        Ok(date) => Ok(tera::Value::String(date.format(&format).to_string())),
        // Undated or malformed: show as written
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub description: String,
    pub url: String,
    pub root: String,
    pub nav: Vec<NavItem>,
    pub math: bool,
    pub blog_path: String,
    pub search_endpoint: String,
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeData {
    pub links: Vec<LinkConfig>,
    pub recent: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogData {
    pub query: String,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectData {
    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub name: String,
    pub date: String,
    pub topics: Vec<String>,
    pub html: String,
    pub excerpt: String,
    pub anchors: Vec<HeadingAnchor>,
}
