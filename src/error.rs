//! Error types for content loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying a catalog.
///
/// Every error produced while processing a file names that file, so a
/// failed load points straight at the content that needs fixing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed front-matter in {path:?}: {message}")]
    MalformedFrontMatter { path: PathBuf, message: String },

    #[error("Missing required field `{field}` in {path:?}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Invalid `{field}` value {value:?} in {path:?}")]
    InvalidDate {
        path: PathBuf,
        field: &'static str,
        value: String,
    },

    #[error("Duplicate slug `{slug}`: {path:?} collides with {first:?}")]
    DuplicateSlug {
        slug: String,
        path: PathBuf,
        first: PathBuf,
    },

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedFrontMatter {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
