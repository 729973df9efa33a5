//! Shared fixtures: canned Reddit payloads and fake collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use threadpull::core::flatten::FlattenLimits;
use threadpull::core::store::memory::InMemoryJobStore;
use threadpull::error::ExtractError;
use threadpull::extract::Extractor;
use threadpull::reddit::{Credentials, PostTarget, ThreadSource, TokenProvider};

pub const POST_URL: &str = "https://www.reddit.com/r/test/comments/abc123/title/";

pub fn credentials() -> Credentials {
    Credentials {
        client_id: "client".into(),
        client_secret: "secret".into(),
        username: "tester".into(),
    }
}

/// The `/comments/{id}.json` payload: post "Hello, World!" with a comment
/// `a`, a deleted reply `b`, its surviving child `c`, and a `more` stub.
pub fn thread_payload() -> Value {
    json!([
        { "kind": "Listing", "data": { "children": [{
            "kind": "t3",
            "data": {
                "title": "Hello, World!",
                "author": "op",
                "url": POST_URL,
                "score": 10,
                "num_comments": 3,
                "created_utc": 1700000000.0
            }
        }]}},
        { "kind": "Listing", "data": { "children": [
            {
                "kind": "t1",
                "data": {
                    "id": "a", "body": "hi", "author": "u1", "score": 5, "created_utc": 1000,
                    "replies": { "kind": "Listing", "data": { "children": [{
                        "kind": "t1",
                        "data": {
                            "id": "b", "body": "[deleted]", "created_utc": 1001,
                            "replies": { "kind": "Listing", "data": { "children": [{
                                "kind": "t1",
                                "data": { "id": "c", "body": "reply\nsecond line", "author": "u2", "score": 1, "created_utc": 1002, "replies": "" }
                            }]}}
                        }
                    }]}}
                }
            },
            { "kind": "more", "data": { "count": 40, "children": ["x", "y"] } }
        ]}}
    ])
}

pub struct FakeTokens {
    pub reject: bool,
    pub calls: AtomicUsize,
}

impl FakeTokens {
    pub fn ok() -> Self {
        Self { reject: false, calls: AtomicUsize::new(0) }
    }

    pub fn rejecting() -> Self {
        Self { reject: true, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl TokenProvider for FakeTokens {
    async fn access_token(&self, credentials: &Credentials) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(ExtractError::Authentication {
                status: Some(401),
                message: "401 Unauthorized".into(),
            });
        }
        Ok(format!("token-for-{}", credentials.client_id))
    }
}

/// Serves a fixed payload, or a fetch error when `payload` is `None`.
pub struct FakeThreads {
    pub payload: Option<Value>,
    pub calls: AtomicUsize,
}

impl FakeThreads {
    pub fn serving(payload: Value) -> Self {
        Self { payload: Some(payload), calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { payload: None, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl ThreadSource for FakeThreads {
    async fn fetch_thread(&self, target: &PostTarget, token: &str) -> Result<Value, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(target.subreddit, "test");
        assert_eq!(target.post_id, "abc123");
        assert_eq!(token, "token-for-client");
        self.payload
            .clone()
            .ok_or_else(|| ExtractError::Fetch("503 Service Unavailable".into()))
    }
}

pub fn extractor(tokens: Arc<FakeTokens>, threads: Arc<FakeThreads>) -> Extractor {
    Extractor::new(
        Arc::new(InMemoryJobStore::new()),
        tokens,
        threads,
        FlattenLimits::default(),
    )
}
