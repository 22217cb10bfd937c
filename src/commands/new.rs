//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::{FrontMatter, PostMetadata, DATE_FORMAT};
use crate::Folio;

/// Create a post dated today; returns the path of the new file
pub fn create_post(folio: &Folio, title: &str, topics: &[String]) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Post title must not be empty");
    }

    let topics: Vec<String> = topics
        .iter()
        .flat_map(|t| t.split_whitespace())
        .map(str::to_string)
        .collect();
    if topics.is_empty() {
        anyhow::bail!("A post needs at least one topic");
    }

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}", title);
    }

    fs::create_dir_all(&folio.posts_dir)?;
    let file_path = folio.posts_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let metadata = PostMetadata {
        date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        topics,
    };
    let content = format!("{}\n# {}\n", FrontMatter::render(&metadata), title);

    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Run the new command
pub fn run(folio: &Folio, title: &str, topics: &[String]) -> Result<()> {
    let file_path = create_post(folio, title, topics)?;
    println!("Created: {:?}", file_path);
    Ok(())
}
