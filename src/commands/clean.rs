//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Remove the pre-rendered output
pub fn run(folio: &Folio) -> Result<()> {
    if folio.output_dir.exists() {
        fs::remove_dir_all(&folio.output_dir)?;
        tracing::info!("Deleted: {:?}", folio.output_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", folio.output_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_output() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(folio.output_dir.join("blog")).unwrap();
        fs::write(folio.output_dir.join("index.html"), "x").unwrap();

        run(&folio).unwrap();
        assert!(!folio.output_dir.exists());

        // Second run is a no-op
        run(&folio).unwrap();
    }
}
