//! Search posts from the command line

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::search::Debouncer;
use crate::{Folio, Site};

/// Print the ranked matches for a single query
pub fn run(folio: &Folio, query: &str) -> Result<()> {
    let site = folio.load_site()?;
    for line in result_lines(&site, query) {
        println!("{}", line);
    }
    Ok(())
}

/// Read queries from stdin, searching once typing settles
pub async fn interactive(folio: &Folio) -> Result<()> {
    let site = Arc::new(folio.load_site()?);
    let delay = Duration::from_millis(site.config().search.debounce_ms);
    println!("Type a query and press Enter (Ctrl+D to quit).");

    let searcher = site.clone();
    let debouncer = Debouncer::new(delay, move |query: String| {
        tracing::debug!("Searching for {:?}", query);
        for line in result_lines(&searcher, &query) {
            println!("{}", line);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        debouncer.call(line);
    }

    debouncer.finish().await;
    Ok(())
}

fn result_lines(site: &Site, query: &str) -> Vec<String> {
    let results = site.search(query);
    if results.is_empty() {
        return vec![format!("No posts match {:?}", query.trim())];
    }
    results
        .iter()
        .map(|post| format!("  {} - {} ({})", post.date, post.name, post.path))
        .collect()
}
