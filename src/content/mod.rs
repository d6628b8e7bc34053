//! Content module - posts, front-matter parsing, and the catalog

mod catalog;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use catalog::{Catalog, TagIndex};
pub use frontmatter::{normalize_tag, FrontMatter};
pub use loader::ContentIndexer;
pub use markdown::MarkdownRenderer;
pub use post::Post;
