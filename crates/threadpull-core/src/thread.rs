//! Decoder for Reddit's `/r/{sub}/comments/{id}.json` response.
//!
//! The endpoint returns a two-element array of listings: the first wraps
//! the post itself, the second wraps the top-level reply nodes. Anything
//! else is rejected here so callers can surface it as a fetch error.

use anyhow::{anyhow, bail, Result};
use serde_json::Value;

use crate::flatten::{flatten_with_limits, integer, listing_children, FlattenLimits, Flattened};
use crate::models::{Post, DELETED_AUTHOR};

/// A decoded comment listing: post metadata plus the raw reply nodes.
#[derive(Debug, Clone)]
pub struct RawThread {
    pub post: Post,
    pub children: Vec<Value>,
}

impl RawThread {
    /// Decode the raw response body.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut listings = match value {
            Value::Array(items) => items,
            _ => bail!("unexpected Reddit API response format: expected an array"),
        };
        if listings.len() < 2 {
            bail!(
                "unexpected Reddit API response format: expected 2 listings, got {}",
                listings.len()
            );
        }

        let post = decode_post(&listings[0])?;
        let children = match listings.swap_remove(1) {
            Value::Object(mut listing) => match listing.remove("data") {
                Some(Value::Object(mut data)) => match data.remove("children") {
                    Some(Value::Array(children)) => children,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Ok(Self { post, children })
    }

    /// Flatten the reply nodes.
    pub fn flatten(&self, limits: &FlattenLimits) -> Flattened {
        flatten_with_limits(&self.children, limits)
    }
}

fn decode_post(listing: &Value) -> Result<Post> {
    let data = listing_children(listing)
        .first()
        .and_then(|node| node.get("data"))
        .ok_or_else(|| anyhow!("unexpected Reddit API response format: missing post data"))?;

    let title = data
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("unexpected Reddit API response format: post has no title"))?;

    let text = |key: &str| data.get(key).and_then(Value::as_str);

    Ok(Post {
        title: title.to_string(),
        author: text("author").unwrap_or(DELETED_AUTHOR).to_string(),
        url: text("url").unwrap_or_default().to_string(),
        score: integer(data.get("score")),
        num_comments: integer(data.get("num_comments")),
        created_utc: integer(data.get("created_utc")),
    })
}
