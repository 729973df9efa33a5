//! Plain-text export and download filenames.
//!
//! [`format_as_text`] renders a post and its flattened comments as a
//! human-readable document. Output depends only on its inputs: timestamps
//! are rendered in UTC from the stored epoch seconds, never from the clock.
//!
//! ```text
//! Reddit Post: <title>
//! Author: u/<author>
//! Score: <score>
//! Total Comments: <num_comments>
//! Posted: 2023-11-14 22:13:20 UTC
//! URL: <url>
//!
//! ====...==== (80)
//! COMMENTS
//! ====...==== (80)
//!
//! Author: <author>
//! Score: <score>
//! Posted: <timestamp>
//! Comment:
//! <body>
//! ----...---- (40)
//!     Author: <reply author>        <- 4 spaces per depth level
//!     ...
//! ```

use crate::models::{Comment, Post};

const HEADER_RULE_WIDTH: usize = 80;
const COMMENT_RULE_WIDTH: usize = 40;
const INDENT: &str = "    ";
const MAX_FILENAME_STEM: usize = 80;

/// Render a post and its flattened comments as text.
pub fn format_as_text(post: &Post, comments: &[Comment]) -> String {
    let mut out = String::new();
    let header_rule = "=".repeat(HEADER_RULE_WIDTH);
    let comment_rule = "-".repeat(COMMENT_RULE_WIDTH);

    out.push_str(&format!("Reddit Post: {}\n", post.title));
    out.push_str(&format!("Author: u/{}\n", post.author));
    out.push_str(&format!("Score: {}\n", post.score));
    out.push_str(&format!("Total Comments: {}\n", post.num_comments));
    out.push_str(&format!("Posted: {}\n", format_timestamp(post.created_utc)));
    out.push_str(&format!("URL: {}\n\n", post.url));
    out.push_str(&format!("{}\nCOMMENTS\n{}\n\n", header_rule, header_rule));

    for comment in comments {
        let indent = INDENT.repeat(comment.depth);
        let body = comment.body.replace('\n', &format!("\n{}", indent));
        out.push_str(&format!("{}Author: {}\n", indent, comment.author));
        out.push_str(&format!("{}Score: {}\n", indent, comment.score));
        out.push_str(&format!(
            "{}Posted: {}\n",
            indent,
            format_timestamp(comment.created_utc)
        ));
        out.push_str(&format!("{}Comment:\n", indent));
        out.push_str(&format!("{}{}\n", indent, body));
        out.push_str(&format!("{}{}\n", indent, comment_rule));
    }

    out
}

/// Render epoch seconds as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Out-of-range values fall back to the raw number.
pub fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Download filename for a job's artifact, without a directory.
///
/// The stem is the post title lower-cased with every run of non-alphanumeric
/// characters replaced by a single `_`. Falls back to
/// `reddit-comments-{job_id}` when there is no usable title.
pub fn suggested_filename(title: Option<&str>, job_id: u64, extension: &str) -> String {
    let stem = title.map(sanitize_title).unwrap_or_default();
    if stem.is_empty() {
        format!("reddit-comments-{}.{}", job_id, extension)
    } else {
        format!("{}.{}", stem, extension)
    }
}

fn sanitize_title(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let trimmed: String = stem
        .trim_matches('_')
        .chars()
        .take(MAX_FILENAME_STEM)
        .collect();
    trimmed.trim_end_matches('_').to_string()
}
