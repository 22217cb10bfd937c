//! List site content

use anyhow::Result;

use crate::helpers::url_for;
use crate::routes::Route;
use crate::{Folio, Site};

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let site = folio.load_site()?;
    for line in lines(&site, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// The listing for `content_type`, one output line per entry
pub fn lines(site: &Site, content_type: &str) -> Result<Vec<String>> {
    let index = site.index();
    let mut out = Vec::new();

    match content_type {
        "post" | "posts" => {
            out.push(format!("Posts ({}):", index.len()));
            for post in index.sorted_by_date() {
                let date = if post.metadata.date.is_empty() {
                    "--/--/----"
                } else {
                    post.metadata.date.as_str()
                };
                out.push(format!("  {} - {} [{}]", date, post.name, post.source_id));
            }
            let duplicates = index.duplicates();
            if !duplicates.is_empty() {
                out.push(format!("Duplicate names: {}", duplicates.join(", ")));
            }
        }
        "topic" | "topics" => {
            let mut topics: Vec<_> = index.topics().into_iter().collect();
            out.push(format!("Topics ({}):", topics.len()));
            topics.sort_by(|a, b| b.1.cmp(&a.1));
            for (topic, count) in topics {
                out.push(format!("  {} ({})", topic, count));
            }
        }
        "route" | "routes" => {
            let root = &site.config().root;
            let entries: Vec<_> = site.routes().entries().collect();
            out.push(format!("Routes ({}):", entries.len()));
            for (path, route) in entries {
                let target = match route {
                    Route::Page(page) => page.name().to_string(),
                    Route::Post(position) => index
                        .get(position)
                        .map(|post| post.source_id.clone())
                        .unwrap_or_default(),
                };
                out.push(format!("  {} -> {}", url_for(root, path), target));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, topics, routes",
                content_type
            );
        }
    }

    Ok(out)
}
