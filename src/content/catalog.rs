//! Catalog snapshot and tag index

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::frontmatter::normalize_tag;
use super::Post;
use crate::error::{Error, Result};

/// Inverted index from normalized tag to the slugs carrying it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TagIndex {
    tags: BTreeMap<String, BTreeSet<String>>,
}

impl TagIndex {
    fn build<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Self {
        let mut tags: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for post in posts {
            for tag in &post.tags {
                tags.entry(tag.clone())
                    .or_default()
                    .insert(post.slug.clone());
            }
        }
        Self { tags }
    }

    /// Slugs filed under `tag`; the lookup is case-insensitive
    pub fn slugs(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.tags.get(&normalize_tag(tag))
    }

    /// `(tag, post count)` pairs in tag order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tags.iter().map(|(tag, slugs)| (tag.as_str(), slugs.len()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Immutable snapshot of a content directory.
///
/// Posts are held newest first (ties broken by slug) and every slug in the
/// tag index refers to a post in the snapshot. A reload builds a new
/// `Catalog`; nothing here is mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    posts: IndexMap<String, Post>,
    tags: TagIndex,
}

impl Catalog {
    /// Build a catalog from posts with distinct slugs, in any order
    pub(crate) fn from_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        let tags = TagIndex::build(&posts);
        let posts = posts
            .into_iter()
            .map(|post| (post.slug.clone(), post))
            .collect();
        Self { posts, tags }
    }

    /// All posts, newest first
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Posts carrying `tag`, newest first. Unknown tags yield an empty list.
    pub fn by_tag(&self, tag: &str) -> Vec<&Post> {
        match self.tags.slugs(tag) {
            Some(slugs) => self
                .posts
                .values()
                .filter(|post| slugs.contains(&post.slug))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn by_slug(&self, slug: &str) -> Result<&Post> {
        self.posts
            .get(slug)
            .ok_or_else(|| Error::NotFound(slug.to_string()))
    }

    /// The post published just after `slug`
    pub fn newer(&self, slug: &str) -> Option<&Post> {
        let pos = self.posts.get_index_of(slug)?;
        let pos = pos.checked_sub(1)?;
        self.posts.get_index(pos).map(|(_, post)| post)
    }

    /// The post published just before `slug`
    pub fn older(&self, slug: &str) -> Option<&Post> {
        let pos = self.posts.get_index_of(slug)?;
        self.posts.get_index(pos + 1).map(|(_, post)| post)
    }
}
