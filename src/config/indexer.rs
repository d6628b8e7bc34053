//! Indexer configuration (_config.yml)

use chrono_tz::Tz;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Options controlling how a content directory is scanned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    // Scan
    pub recursive: bool,
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,

    // Writing
    pub timezone: String,
    pub slugify_filenames: bool,
    pub render_excerpts: bool,

    // Date / Time format
    pub date_format: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            extensions: vec!["md".to_string()],
            exclude: Vec::new(),

            timezone: "UTC".to_string(),
            slugify_filenames: false,
            render_excerpts: true,

            date_format: "YYYY-MM-DD".to_string(),
        }
    }
}

impl IndexerConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve the configured time zone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|e| Error::Config(format!("unknown timezone `{}`: {}", self.timezone, e)))
    }

    /// Compile the exclude globs
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.exclude
            .iter()
            .map(|p| {
                Pattern::new(p)
                    .map_err(|e| Error::Config(format!("invalid exclude pattern `{}`: {}", p, e)))
            })
            .collect()
    }

    /// Check whether a path carries one of the configured Markdown extensions
    pub fn is_markdown_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                self.extensions
                    .iter()
                    .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(e))
            })
            .unwrap_or(false)
    }
}
