//! Reply-tree flattener.
//!
//! Turns Reddit's nested listing of comment nodes into a flat, ordered
//! [`Vec<Comment>`] where every entry carries its parent id and depth.
//!
//! # Algorithm
//!
//! Pre-order depth-first traversal driven by an explicit stack, so deep
//! threads never grow the call stack:
//!
//! 1. Nodes whose `kind` is not `t1` (e.g. `more` stubs) are skipped along
//!    with anything nested inside them.
//! 2. A `t1` node whose body is missing, empty, `[deleted]` or `[removed]`
//!    is not emitted, but its replies are still visited with the dropped
//!    node's id as their parent and its depth + 1 as their depth.
//! 3. Every other `t1` node is emitted, immediately followed by all of its
//!    surviving descendants, before the next sibling.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use threadpull_core::flatten::flatten;
//!
//! let children = json!([
//!     { "kind": "t1", "data": { "id": "a", "body": "hi", "author": "u1", "score": 5, "created_utc": 1000 } },
//!     { "kind": "more", "data": { "count": 12 } }
//! ]);
//! let comments = flatten(children.as_array().unwrap());
//! assert_eq!(comments.len(), 1);
//! assert_eq!(comments[0].depth, 0);
//! ```

use serde_json::Value;

use crate::models::{Comment, DELETED_AUTHOR};

/// Reddit's kind tag for comment nodes.
pub const COMMENT_KIND: &str = "t1";

static NULL: Value = Value::Null;

const DEFAULT_MAX_DEPTH: usize = 500;
const DEFAULT_MAX_COMMENTS: usize = 100_000;

/// Ceilings that bound traversal of hostile or pathological input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenLimits {
    /// Nodes at this depth or deeper are not visited.
    pub max_depth: usize,
    /// Traversal stops once this many comments have been emitted.
    pub max_comments: usize,
}

impl Default for FlattenLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_comments: DEFAULT_MAX_COMMENTS,
        }
    }
}

/// Result of [`flatten_with_limits`].
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    pub comments: Vec<Comment>,
    /// Set when a limit cut the traversal short.
    pub truncated: bool,
}

/// Flatten a reply list with the default [`FlattenLimits`].
pub fn flatten(children: &[Value]) -> Vec<Comment> {
    flatten_with_limits(children, &FlattenLimits::default()).comments
}

/// Flatten a reply list, stopping at the given limits.
pub fn flatten_with_limits(children: &[Value], limits: &FlattenLimits) -> Flattened {
    let mut out = Flattened::default();
    let mut stack: Vec<(&Value, Option<String>, usize)> = children
        .iter()
        .rev()
        .map(|node| (node, None, 0))
        .collect();

    while let Some((node, parent_id, depth)) = stack.pop() {
        if node.get("kind").and_then(Value::as_str) != Some(COMMENT_KIND) {
            continue;
        }
        if depth >= limits.max_depth {
            out.truncated = true;
            continue;
        }

        let data = node.get("data").unwrap_or(&NULL);
        let id = data
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if let Some(body) = visible_body(data) {
            if out.comments.len() >= limits.max_comments {
                out.truncated = true;
                break;
            }
            out.comments.push(Comment {
                id: id.clone(),
                parent_id,
                author: data
                    .get("author")
                    .and_then(Value::as_str)
                    .unwrap_or(DELETED_AUTHOR)
                    .to_string(),
                body: body.to_string(),
                score: integer(data.get("score")),
                created_utc: integer(data.get("created_utc")),
                depth,
            });
        }

        for reply in replies(data).iter().rev() {
            stack.push((reply, Some(id.clone()), depth + 1));
        }
    }

    out
}

/// The comment body, unless it is missing or a deletion sentinel.
fn visible_body(data: &Value) -> Option<&str> {
    match data.get("body").and_then(Value::as_str) {
        None | Some("") | Some("[deleted]") | Some("[removed]") => None,
        Some(body) => Some(body),
    }
}

/// Reply nodes of a comment. Reddit sends `""` when there are none.
fn replies(data: &Value) -> &[Value] {
    data.get("replies").map(listing_children).unwrap_or(&[])
}

/// `data.children` of a listing, or an empty slice for any other shape.
pub(crate) fn listing_children(listing: &Value) -> &[Value] {
    listing
        .get("data")
        .and_then(|d| d.get("children"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Integer field that Reddit may encode as a float (`created_utc`), or 0.
pub(crate) fn integer(value: Option<&Value>) -> i64 {
    match value {
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn t1(id: &str, body: &str, replies: Value) -> Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "author": format!("user_{}", id),
                "body": body,
                "score": 1,
                "created_utc": 1000.0,
                "replies": replies,
            }
        })
    }

    fn listing(children: Vec<Value>) -> Value {
        json!({ "kind": "Listing", "data": { "children": children } })
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_deleted_parent_keeps_surviving_child() {
        let tree = json!([{
            "kind": "t1",
            "data": {
                "id": "a", "body": "hi", "author": "u1", "score": 5, "created_utc": 1000,
                "replies": { "data": { "children": [{
                    "kind": "t1",
                    "data": {
                        "id": "b", "body": "[deleted]", "created_utc": 1001,
                        "replies": { "data": { "children": [{
                            "kind": "t1",
                            "data": { "id": "c", "body": "reply", "author": "u2", "score": 1, "created_utc": 1002 }
                        }]}}
                    }
                }]}}
            }
        }]);

        let comments = flatten(tree.as_array().unwrap());
        assert_eq!(comments.len(), 2);

        assert_eq!(comments[0].id, "a");
        assert_eq!(comments[0].depth, 0);
        assert_eq!(comments[0].parent_id, None);
        assert_eq!(comments[0].score, 5);

        assert_eq!(comments[1].id, "c");
        assert_eq!(comments[1].depth, 2);
        assert_eq!(comments[1].parent_id.as_deref(), Some("b"));
        assert_eq!(comments[1].author, "u2");
    }

    #[test]
    fn test_preorder_before_siblings() {
        let tree = vec![
            t1(
                "a",
                "A",
                listing(vec![
                    t1("a1", "A1", listing(vec![t1("a1x", "A1X", json!(""))])),
                    t1("a2", "A2", json!("")),
                ]),
            ),
            t1("b", "B", listing(vec![t1("b1", "B1", json!(""))])),
        ];

        let comments = flatten(&tree);
        assert_eq!(ids(&comments), vec!["a", "a1", "a1x", "a2", "b", "b1"]);
        let depths: Vec<usize> = comments.iter().map(|c| c.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0, 1]);
        assert_eq!(comments[3].parent_id.as_deref(), Some("a"));
        assert_eq!(comments[5].parent_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_more_stubs_are_skipped_without_recursing() {
        let tree = vec![
            t1("a", "A", json!("")),
            json!({
                "kind": "more",
                "data": {
                    "id": "m",
                    "children": ["x", "y"],
                    "replies": listing(vec![t1("hidden", "H", json!(""))]),
                }
            }),
        ];
        assert_eq!(ids(&flatten(&tree)), vec!["a"]);
    }

    #[test]
    fn test_removed_and_missing_bodies_filtered() {
        let tree = vec![
            t1("a", "[removed]", json!("")),
            t1("b", "", json!("")),
            json!({ "kind": "t1", "data": { "id": "c" } }),
            t1("d", "kept", json!("")),
        ];
        assert_eq!(ids(&flatten(&tree)), vec!["d"]);
    }

    #[test]
    fn test_defaults_for_missing_author_and_score() {
        let tree = vec![json!({
            "kind": "t1",
            "data": { "id": "a", "body": "text", "author": null, "created_utc": 1700000000.0 }
        })];
        let comments = flatten(&tree);
        assert_eq!(comments[0].author, "[deleted]");
        assert_eq!(comments[0].score, 0);
        assert_eq!(comments[0].created_utc, 1_700_000_000);
    }

    #[test]
    fn test_negative_score_preserved() {
        let tree = vec![json!({
            "kind": "t1",
            "data": { "id": "a", "body": "x", "author": "u", "score": -12, "created_utc": 1 }
        })];
        assert_eq!(flatten(&tree)[0].score, -12);
    }

    #[test]
    fn test_malformed_replies_treated_as_empty() {
        let tree = vec![
            t1("a", "A", json!({ "data": { "children": "nope" } })),
            t1("b", "B", json!({ "data": {} })),
            t1("c", "C", json!(42)),
        ];
        assert_eq!(ids(&flatten(&tree)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_depth_limit_truncates() {
        let mut node = t1("d3", "deepest", json!(""));
        for id in ["d2", "d1", "d0"] {
            node = t1(id, id, listing(vec![node]));
        }
        let limits = FlattenLimits {
            max_depth: 2,
            max_comments: 100,
        };
        let out = flatten_with_limits(&[node], &limits);
        assert_eq!(ids(&out.comments), vec!["d0", "d1"]);
        assert!(out.truncated);
    }

    #[test]
    fn test_comment_limit_truncates() {
        let tree: Vec<Value> = (0..10).map(|i| t1(&i.to_string(), "x", json!(""))).collect();
        let limits = FlattenLimits {
            max_depth: 10,
            max_comments: 3,
        };
        let out = flatten_with_limits(&tree, &limits);
        assert_eq!(out.comments.len(), 3);
        assert!(out.truncated);

        let out = flatten_with_limits(&tree, &FlattenLimits::default());
        assert_eq!(out.comments.len(), 10);
        assert!(!out.truncated);
    }

    #[test]
    fn test_depth_is_parent_depth_plus_one() {
        let tree = vec![t1(
            "a",
            "A",
            listing(vec![
                t1("b", "B", listing(vec![t1("c", "C", json!(""))])),
                t1("d", "[deleted]", listing(vec![t1("e", "E", json!(""))])),
            ]),
        )];
        let comments = flatten(&tree);
        for c in &comments {
            match &c.parent_id {
                None => assert_eq!(c.depth, 0),
                Some(pid) => {
                    if let Some(parent) = comments.iter().find(|p| &p.id == pid) {
                        assert_eq!(c.depth, parent.depth + 1);
                    }
                }
            }
        }
        assert_eq!(ids(&comments), vec!["a", "b", "c", "e"]);
        assert_eq!(comments[3].depth, 2);
    }
}
