//! Validate a content directory

use anyhow::{Context, Result};
use std::path::Path;

use crate::content::Catalog;
use crate::Site;

/// Load `dir` and report what was found. Any content error fails the check.
pub fn run(site: &Site, dir: &Path) -> Result<()> {
    let catalog = site
        .load(dir)
        .with_context(|| format!("Content check failed for {:?}", dir))?;

    print!("{}", render(&catalog, &site.content_dir(dir)));
    Ok(())
}

/// Summary line for a loaded catalog
pub fn render(catalog: &Catalog, dir: &Path) -> String {
    format!(
        "OK: {} posts, {} tags in {:?}\n",
        catalog.len(),
        catalog.tags().len(),
        dir
    )
}
