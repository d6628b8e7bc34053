//! CLI commands

pub mod check;
pub mod list;
pub mod show;
pub mod tag;
pub mod watch;

use crate::content::Post;
use crate::helpers::format_date;

/// One-line summary of a post: date, slug, title, tags
fn post_line(post: &Post, date_format: &str) -> String {
    let mut line = format!(
        "  {} {} - {}",
        format_date(&post.date, date_format),
        post.slug,
        post.title
    );
    if !post.tags.is_empty() {
        line.push_str(&format!(" [{}]", post.tags.join(", ")));
    }
    line
}
