//! Show a single post

use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::Path;

use crate::content::Catalog;
use crate::helpers::format_date;
use crate::Site;

/// Print the post stored under `slug`
pub fn run(site: &Site, dir: &Path, slug: &str, json: bool) -> Result<()> {
    let catalog = site
        .load(dir)
        .with_context(|| format!("Failed to load {:?}", dir))?;
    print!("{}", render(&catalog, slug, &site.config.date_format, json)?);
    Ok(())
}

pub fn render(catalog: &Catalog, slug: &str, date_format: &str, json: bool) -> Result<String> {
    let post = catalog.by_slug(slug)?;
    let mut out = String::new();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(post)?)?;
        return Ok(out);
    }

    writeln!(out, "title:   {}", post.title)?;
    writeln!(out, "slug:    {}", post.slug)?;
    writeln!(out, "date:    {}", format_date(&post.date, date_format))?;
    if let Some(updated) = &post.updated {
        writeln!(out, "updated: {}", format_date(updated, date_format))?;
    }
    writeln!(out, "tags:    {}", post.tags.join(", "))?;
    writeln!(out, "source:  {}", post.source.display())?;
    if let Some(newer) = catalog.newer(slug) {
        writeln!(out, "newer:   {}", newer.slug)?;
    }
    if let Some(older) = catalog.older(slug) {
        writeln!(out, "older:   {}", older.slug)?;
    }
    writeln!(out)?;
    out.push_str(&post.body);

    Ok(out)
}
