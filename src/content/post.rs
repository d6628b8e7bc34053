//! Post model

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Slug (file stem, unique within a catalog)
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<FixedOffset>,

    /// Last updated date
    pub updated: Option<DateTime<FixedOffset>>,

    /// Normalized tags in first-seen order
    pub tags: Vec<String>,

    /// Source file path, relative to the scanned directory
    pub source: PathBuf,

    /// Raw markdown before `<!-- more -->`
    pub excerpt: Option<String>,

    /// Excerpt rendered to HTML
    pub rendered_excerpt: Option<String>,

    /// Raw markdown body, verbatim
    pub body: String,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: String, title: String, date: DateTime<FixedOffset>) -> Self {
        Self {
            source: PathBuf::from(format!("{}.md", slug)),
            slug,
            title,
            date,
            updated: None,
            tags: Vec::new(),
            excerpt: None,
            rendered_excerpt: None,
            body: String::new(),
        }
    }

    /// Whether the post carries `tag` (already normalized)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
