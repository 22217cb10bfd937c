//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub description: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub posts_dir: String,
    pub assets_dir: String,
    pub output_dir: String,

    // Writing
    /// Image sources are cut after the last occurrence of this marker
    pub asset_marker: String,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub math: MathConfig,

    // Search
    #[serde(default)]
    pub search: SearchConfig,

    // Pages
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            author: "Anonymous".to_string(),
            description: String::new(),

            url: "http://localhost:5173".to_string(),
            root: "/".to_string(),

            posts_dir: "posts".to_string(),
            assets_dir: "public".to_string(),
            output_dir: "dist".to_string(),

            asset_marker: "/blog/".to_string(),
            highlight: HighlightConfig::default(),
            math: MathConfig::default(),

            search: SearchConfig::default(),

            projects: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Server-side code highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Math typesetting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub enable: bool,
    pub error_color: String,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            enable: true,
            error_color: "#FF0000".to_string(),
        }
    }
}

/// Blog search behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a query runs
    pub debounce_ms: u64,
    /// Minimum score per query character
    pub threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 350,
            threshold: 0.5,
        }
    }
}

/// A project card on the Project page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub topics: Vec<String>,
}

/// An external link on the Home page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub label: String,
    pub url: String,
}
