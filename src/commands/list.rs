//! List catalog content

use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::Path;

use super::post_line;
use crate::content::Catalog;
use crate::Site;

/// List posts or tags found in `dir`
pub fn run(site: &Site, dir: &Path, content_type: &str, json: bool) -> Result<()> {
    let catalog = site
        .load(dir)
        .with_context(|| format!("Failed to load {:?}", dir))?;
    print!(
        "{}",
        render(&catalog, content_type, &site.config.date_format, json)?
    );
    Ok(())
}

/// Render a listing of `content_type` (post or tag)
pub fn render(catalog: &Catalog, content_type: &str, date_format: &str, json: bool) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            if json {
                let posts: Vec<_> = catalog.posts().collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&posts)?)?;
            } else {
                writeln!(out, "Posts ({}):", catalog.len())?;
                for post in catalog.posts() {
                    writeln!(out, "{}", post_line(post, date_format))?;
                }
            }
        }
        "tag" | "tags" => {
            // Busiest tags first, then by name
            let mut tags: Vec<_> = catalog.tags().iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            if json {
                let tags: Vec<_> = tags
                    .into_iter()
                    .map(|(tag, count)| serde_json::json!({ "tag": tag, "count": count }))
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&tags)?)?;
            } else {
                writeln!(out, "Tags ({}):", tags.len())?;
                for (tag, count) in tags {
                    writeln!(out, "  {} ({})", tag, count)?;
                }
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentIndexer, IndexerConfig};
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("rails.md"),
            "---\ntitle: Rails Q&A\ndate: 2019-03-13 10:20:30\ntags: ruby, rails\n---\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("rack.md"),
            "---\ntitle: Rack\ndate: 2019-04-01\ntags: Ruby\n---\n",
        )
        .unwrap();
        ContentIndexer::new(IndexerConfig::default())
            .unwrap()
            .load(dir.path())
            .unwrap()
    }

    #[test]
    fn test_list_posts() {
        let out = render(&catalog(), "post", "YYYY-MM-DD", false).unwrap();
        assert_eq!(
            out,
            "Posts (2):\n  2019-04-01 rack - Rack [ruby]\n  2019-03-13 rails - Rails Q&A [ruby, rails]\n"
        );
    }

    #[test]
    fn test_list_tags_by_count() {
        let out = render(&catalog(), "tags", "YYYY-MM-DD", false).unwrap();
        assert_eq!(out, "Tags (2):\n  ruby (2)\n  rails (1)\n");
    }

    #[test]
    fn test_list_posts_json() {
        let out = render(&catalog(), "post", "YYYY-MM-DD", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["slug"], "rack");
        assert_eq!(value[1]["tags"][1], "rails");
    }

    #[test]
    fn test_unknown_type() {
        assert!(render(&catalog(), "category", "YYYY-MM-DD", false).is_err());
    }
}
