//! Pre-render the site into static files

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::routes::Route;
use crate::{Folio, Site};

/// Render every route, write the search index and copy assets
pub fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let site = folio.load_site()?;
    tracing::info!("Loaded {} posts", site.index().len());

    fs::create_dir_all(&folio.output_dir)?;

    let pages = write_routes(&site, &folio.output_dir)?;
    write_search_index(&site, &folio.output_dir)?;
    let assets = copy_assets(&folio.assets_dir, &folio.output_dir)?;

    tracing::info!(
        "Generated {} pages and copied {} assets in {:.2}s",
        pages,
        assets,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Render each routed path to its HTML file
fn write_routes(site: &Site, output_dir: &Path) -> Result<usize> {
    let mut count = 0;
    for (path, route) in site.routes().entries() {
        let Some(relative) = output_file(path) else {
            tracing::warn!("Skipping route {:?}: not a safe file name", path);
            continue;
        };

        let html = site
            .render_route(route, None)
            .with_context(|| format!("Failed to render {}", path))?;

        let output_path = output_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;

        if matches!(route, Route::Post(_)) {
            tracing::debug!("Generated post: {:?}", output_path);
        }
        count += 1;
    }
    Ok(count)
}

/// `/` maps to `index.html`, anything else to `<path>.html`.
///
/// A route ending in `/` has no file name and is skipped.
fn output_file(route_path: &str) -> Option<PathBuf> {
    let trimmed = route_path.trim_start_matches('/');
    if trimmed.ends_with('/') {
        return None;
    }
    let relative = if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else {
        PathBuf::from(format!("{}.html", trimmed))
    };

    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(relative)
}

fn write_search_index(site: &Site, output_dir: &Path) -> Result<()> {
    let output_path = output_dir.join("search.json");
    let json = serde_json::to_string_pretty(&site.search_index())?;
    fs::write(&output_path, json)?;
    tracing::info!("Generated search.json");
    Ok(())
}

/// Copy the static assets directory into the output
fn copy_assets(assets_dir: &Path, output_dir: &Path) -> Result<usize> {
    if !assets_dir.is_dir() {
        tracing::debug!("No assets directory at {:?}", assets_dir);
        return Ok(0);
    }

    let mut count = 0;
    for entry in WalkDir::new(assets_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(assets_dir)?;
        let dest = output_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        count += 1;
    }

    Ok(count)
}
