//! folio: a server-rendered portfolio and blog
//!
//! Posts are Markdown files with an optional `date`/`topics` front-matter
//! block. They are rendered once at startup into an immutable [`Site`],
//! which the server and the static pre-renderer both read from.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod routes;
pub mod search;
pub mod server;
pub mod site;
pub mod templates;

pub use site::Site;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts directory
    pub posts_dir: PathBuf,
    /// Static assets directory
    pub assets_dir: PathBuf,
    /// Pre-render output directory
    pub output_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let assets_dir = base_dir.join(&config.assets_dir);
        let output_dir = base_dir.join(&config.output_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            assets_dir,
            output_dir,
        }
    }

    /// Load and render every post
    pub fn load_site(&self) -> Result<Site> {
        Site::load(self)
    }

    /// Pre-render the site into the output directory
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
