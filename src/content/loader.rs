//! Content indexer - loads posts from a content directory into a catalog

use chrono_tz::Tz;
use glob::Pattern;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{Catalog, FrontMatter, MarkdownRenderer, Post};
use crate::config::IndexerConfig;
use crate::error::{Error, Result};

/// Scans a directory of Markdown files and builds a [`Catalog`]
#[derive(Debug, Clone)]
pub struct ContentIndexer {
    config: IndexerConfig,
    tz: Tz,
    exclude: Vec<Pattern>,
    renderer: MarkdownRenderer,
}

impl ContentIndexer {
    /// Create an indexer, validating the time zone and exclude patterns up front
    pub fn new(config: IndexerConfig) -> Result<Self> {
        let tz = config.tz()?;
        let exclude = config.exclude_patterns()?;
        Ok(Self {
            config,
            tz,
            exclude,
            renderer: MarkdownRenderer::new(),
        })
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Load every post under `dir`.
    ///
    /// The first bad file aborts the load; no partial catalog is returned.
    pub fn load<P: AsRef<Path>>(&self, dir: P) -> Result<Catalog> {
        let dir = dir.as_ref();
        let start = std::time::Instant::now();
        let files = self.collect_files(dir)?;

        let mut claimed: HashMap<String, PathBuf> = HashMap::with_capacity(files.len());
        let mut posts = Vec::with_capacity(files.len());

        for path in files {
            let slug = self.derive_slug(&path)?;
            if let Some(first) = claimed.get(&slug) {
                return Err(Error::DuplicateSlug {
                    slug,
                    path,
                    first: first.clone(),
                });
            }

            let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            let source = path.strip_prefix(dir).unwrap_or(&path);
            let post = self.parse_post(slug.clone(), source, &path, &content)?;
            tracing::debug!("Indexed {:?} as `{}` ({} tags)", source, slug, post.tags.len());

            claimed.insert(slug, path);
            posts.push(post);
        }

        let catalog = Catalog::from_posts(posts);
        tracing::info!(
            "Loaded {} posts and {} tags from {:?} in {:.2}ms",
            catalog.len(),
            catalog.tags().len(),
            dir,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(catalog)
    }

    /// Markdown files under `dir`, in a stable path order
    fn collect_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(dir).map_err(|e| Error::io(dir, e))?;
        if !metadata.is_dir() {
            return Err(Error::io(
                dir,
                io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                Error::io(path, e.into())
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() || !self.config.is_markdown_file(path) {
                continue;
            }

            let relative = path.strip_prefix(dir).unwrap_or(path);
            if self.exclude.iter().any(|p| p.matches_path(relative)) {
                tracing::debug!("Skipping excluded file {:?}", relative);
                continue;
            }

            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Slug for a content file: its stem, optionally slugified
    fn derive_slug(&self, path: &Path) -> Result<String> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::malformed(path, "file name is not valid UTF-8"))?;

        let slug = if self.config.slugify_filenames {
            slug::slugify(stem)
        } else {
            stem.trim().to_string()
        };

        if slug.is_empty() {
            return Err(Error::malformed(
                path,
                format!("file name `{}` yields an empty slug", stem),
            ));
        }
        Ok(slug)
    }

    /// Build a post from file contents.
    ///
    /// `source` is recorded on the post; `path` names the file in errors.
    pub fn parse_post(
        &self,
        slug: String,
        source: &Path,
        path: &Path,
        content: &str,
    ) -> Result<Post> {
        let (fm, body) = FrontMatter::parse(path, content)?;

        let title = fm.require_title(path)?;
        let date = fm.require_date(path, &self.tz)?;
        let updated = fm.parse_updated(path, &self.tz)?;

        let excerpt = MarkdownRenderer::split_excerpt(body).map(str::to_string);
        let rendered_excerpt = if self.config.render_excerpts {
            excerpt.as_deref().map(|e| self.renderer.render(e))
        } else {
            None
        };

        let mut post = Post::new(slug, title, date);
        post.updated = updated;
        post.tags = fm.normalized_tags();
        post.source = source.to_path_buf();
        post.excerpt = excerpt;
        post.rendered_excerpt = rendered_excerpt;
        post.body = body.to_string();

        Ok(post)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RAILS_QA: &str = r#"---
title: Ruby on Rails Interview Questions
date: 2019-03-13 10:20:30
tags: ruby, ruby on rails inteview, ruby interview questions
---
What is **Rack**?
<!-- more -->
Rack is a modular interface between web servers and Ruby frameworks.
"#;

    const TRAEFIK: &str = r#"---
title: Traefik as a reverse proxy
date: 2020-06-01T09:00:00+08:00
tags: Traefik, docker
---
Traefik routes requests to containers.
"#;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn indexer() -> ContentIndexer {
        ContentIndexer::new(IndexerConfig::default()).unwrap()
    }

    fn blog() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "rails-interview.md", RAILS_QA);
        write(dir.path(), "traefik-tutorial.md", TRAEFIK);
        dir
    }

    fn slugs(catalog: &Catalog) -> Vec<&str> {
        catalog.posts().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_load_posts() {
        let dir = blog();
        let catalog = indexer().load(dir.path()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(slugs(&catalog), vec!["traefik-tutorial", "rails-interview"]);

        let post = catalog.by_slug("rails-interview").unwrap();
        assert_eq!(post.title, "Ruby on Rails Interview Questions");
        assert_eq!(post.date.to_rfc3339(), "2019-03-13T10:20:30+00:00");
        assert_eq!(
            post.tags,
            vec!["ruby", "ruby on rails inteview", "ruby interview questions"]
        );
        assert_eq!(post.source, PathBuf::from("rails-interview.md"));
        assert!(post.body.starts_with("What is **Rack**?\n<!-- more -->"));
        assert_eq!(post.excerpt.as_deref(), Some("What is **Rack**?"));
        assert_eq!(
            post.rendered_excerpt.as_deref(),
            Some("<p>What is <strong>Rack</strong>?</p>\n")
        );
    }

    #[test]
    fn test_by_tag_returns_tagged_post() {
        let dir = blog();
        let catalog = indexer().load(dir.path()).unwrap();

        let ruby = catalog.by_tag("ruby");
        assert_eq!(ruby.len(), 1);
        assert_eq!(ruby[0].slug, "rails-interview");
        assert!(catalog.by_tag("kubernetes").is_empty());
    }

    #[test]
    fn test_tags_merge_case_insensitively() {
        let dir = blog();
        write(
            dir.path(),
            "traefik-https.md",
            "---\ntitle: Traefik HTTPS\ndate: 2020-06-02\ntags: traefik\n---\n",
        );
        let catalog = indexer().load(dir.path()).unwrap();

        let traefik: Vec<_> = catalog
            .by_tag("TRAEFIK")
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(traefik, vec!["traefik-https", "traefik-tutorial"]);
        assert_eq!(
            catalog.tags().iter().filter(|(t, _)| t.contains("traefik")).count(),
            1
        );
    }

    #[test]
    fn test_load_is_deterministic() {
        let dir = blog();
        write(dir.path(), "same-day.md", "---\ntitle: Same day\ndate: 2019-03-13 10:20:30\ntags: Ruby\n---\n");
        let indexer = indexer();
        let first = indexer.load(dir.path()).unwrap();
        let second = indexer.load(dir.path()).unwrap();

        assert_eq!(slugs(&first), slugs(&second));
        assert_eq!(slugs(&first), vec!["traefik-tutorial", "rails-interview", "same-day"]);
        assert_eq!(first.tags(), second.tags());
        let first_tags: Vec<_> = first.posts().map(|p| p.tags.clone()).collect();
        let second_tags: Vec<_> = second.posts().map(|p| p.tags.clone()).collect();
        assert_eq!(first_tags, second_tags);
    }

    #[test]
    fn test_missing_date_fails_load() {
        let dir = blog();
        write(dir.path(), "undated.md", "---\ntitle: Undated\n---\nbody\n");
        let err = indexer().load(dir.path()).unwrap_err();
        match err {
            Error::MissingField { field, path } => {
                assert_eq!(field, "date");
                assert!(path.ends_with("undated.md"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_title_fails_load() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "untitled.md", "---\ndate: 2024-01-01\n---\n");
        let err = indexer().load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "title", .. }));
    }

    #[test]
    fn test_unterminated_front_matter_fails_load() {
        let dir = blog();
        write(dir.path(), "broken.md", "---\ntitle: Broken\ndate: 2024-01-01\n");
        let err = indexer().load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_invalid_date_fails_load() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad-date.md", "---\ntitle: Bad\ndate: 2024-02-30\n---\n");
        let err = indexer().load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { field: "date", .. }));
    }

    #[test]
    fn test_duplicate_slug_across_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2019/intro.md", RAILS_QA);
        write(dir.path(), "2020/intro.md", TRAEFIK);
        let indexer = ContentIndexer::new(IndexerConfig {
            recursive: true,
            ..Default::default()
        })
        .unwrap();

        let err = indexer.load(dir.path()).unwrap_err();
        match err {
            Error::DuplicateSlug { slug, path, first } => {
                assert_eq!(slug, "intro");
                assert!(first.ends_with("2019/intro.md"));
                assert!(path.ends_with("2020/intro.md"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_duplicate_slug_after_slugify() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Rails Interview.md", RAILS_QA);
        write(dir.path(), "rails-interview.md", RAILS_QA);
        let indexer = ContentIndexer::new(IndexerConfig {
            slugify_filenames: true,
            ..Default::default()
        })
        .unwrap();

        let err = indexer.load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::DuplicateSlug { ref slug, .. } if slug == "rails-interview"));
    }

    #[test]
    fn test_duplicate_slug_across_extensions() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "post.md", RAILS_QA);
        write(dir.path(), "post.markdown", TRAEFIK);
        let indexer = ContentIndexer::new(IndexerConfig {
            extensions: vec!["md".to_string(), "markdown".to_string()],
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            indexer.load(dir.path()),
            Err(Error::DuplicateSlug { .. })
        ));
    }

    #[test]
    fn test_non_recursive_by_default() {
        let dir = blog();
        write(dir.path(), "drafts/wip.md", "not even front-matter");
        let catalog = indexer().load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_recursive_source_is_relative() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ops/traefik.md", TRAEFIK);
        let indexer = ContentIndexer::new(IndexerConfig {
            recursive: true,
            ..Default::default()
        })
        .unwrap();

        let catalog = indexer.load(dir.path()).unwrap();
        let post = catalog.by_slug("traefik").unwrap();
        assert_eq!(post.source, Path::new("ops").join("traefik.md"));
    }

    #[test]
    fn test_skips_hidden_excluded_and_other_files() {
        let dir = blog();
        write(dir.path(), ".draft.md", "garbage");
        write(dir.path(), "notes.txt", "garbage");
        write(dir.path(), "README.md", "garbage");
        let indexer = ContentIndexer::new(IndexerConfig {
            exclude: vec!["README*".to_string()],
            ..Default::default()
        })
        .unwrap();

        let catalog = indexer.load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_excerpt_rendering_can_be_disabled() {
        let dir = blog();
        let indexer = ContentIndexer::new(IndexerConfig {
            render_excerpts: false,
            ..Default::default()
        })
        .unwrap();

        let catalog = indexer.load(dir.path()).unwrap();
        let post = catalog.by_slug("rails-interview").unwrap();
        assert!(post.excerpt.is_some());
        assert_eq!(post.rendered_excerpt, None);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let catalog = indexer().load(dir.path()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.tags().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = indexer().load(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let dir = blog();
        let err = indexer()
            .load(dir.path().join("rails-interview.md"))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_indexer_keeps_its_config() {
        let indexer = ContentIndexer::new(IndexerConfig {
            recursive: true,
            timezone: "Asia/Shanghai".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(indexer.config().recursive);
        assert_eq!(indexer.config().timezone, "Asia/Shanghai");
    }

    #[test]
    fn test_bad_timezone_rejected_up_front() {
        let result = ContentIndexer::new(IndexerConfig {
            timezone: "Nowhere/Special".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
