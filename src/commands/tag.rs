//! Posts filed under a tag

use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::Path;

use super::post_line;
use crate::content::{normalize_tag, Catalog};
use crate::Site;

pub fn run(site: &Site, dir: &Path, tag: &str, json: bool) -> Result<()> {
    let catalog = site
        .load(dir)
        .with_context(|| format!("Failed to load {:?}", dir))?;
    print!("{}", render(&catalog, tag, &site.config.date_format, json)?);
    Ok(())
}

/// Render the posts under `tag`; an unknown tag renders an empty listing
pub fn render(catalog: &Catalog, tag: &str, date_format: &str, json: bool) -> Result<String> {
    let posts = catalog.by_tag(tag);
    let mut out = String::new();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&posts)?)?;
    } else {
        writeln!(out, "Tag `{}` ({}):", normalize_tag(tag), posts.len())?;
        for post in posts {
            writeln!(out, "{}", post_line(post, date_format))?;
        }
    }

    Ok(out)
}
