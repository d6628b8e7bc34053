//! content-indexer: front-matter aware Markdown loading for static blogs
//!
//! Scans a directory of Markdown posts with YAML front-matter and builds an
//! immutable [`Catalog`] of posts keyed by slug, plus an inverted tag index.
//! Rendering full bodies is left to the downstream site generator.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;

use std::path::{Path, PathBuf};

pub use config::IndexerConfig;
pub use content::{Catalog, ContentIndexer, Post, TagIndex};
pub use error::{Error, Result};

/// Default configuration file looked up in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// Load `dir` with the default configuration
pub fn load<P: AsRef<Path>>(dir: P) -> Result<Catalog> {
    ContentIndexer::new(IndexerConfig::default())?.load(dir)
}

/// A working directory plus the configuration that applies to it
#[derive(Debug, Clone)]
pub struct Site {
    /// Indexer configuration
    pub config: IndexerConfig,
    /// Base directory; relative paths resolve against it
    pub base_dir: PathBuf,
}

impl Site {
    /// Create a site rooted at `base_dir`.
    ///
    /// An explicit `config_path` must exist. Without one, `_config.yml` in
    /// the base directory is used when present, defaults otherwise.
    pub fn new<P: AsRef<Path>>(base_dir: P, config_path: Option<&Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let config = match config_path {
            Some(path) => IndexerConfig::load(base_dir.join(path))?,
            None => {
                let default_path = base_dir.join(CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!("Using config {:?}", default_path);
                    IndexerConfig::load(&default_path)?
                } else {
                    IndexerConfig::default()
                }
            }
        };

        Ok(Self { config, base_dir })
    }

    /// Resolve a content directory against the base directory
    pub fn content_dir(&self, dir: &Path) -> PathBuf {
        self.base_dir.join(dir)
    }

    pub fn indexer(&self) -> Result<ContentIndexer> {
        ContentIndexer::new(self.config.clone())
    }

    /// Build a fresh catalog for `dir`
    pub fn load(&self, dir: &Path) -> Result<Catalog> {
        self.indexer()?.load(self.content_dir(dir))
    }
}
