//! Reddit API collaborators.
//!
//! Two seams sit between the orchestrator and the network:
//!
//! - [`TokenProvider`] exchanges app credentials for a bearer token
//!   (OAuth2 client-credentials grant).
//! - [`ThreadSource`] fetches the raw comment listing for one post.
//!
//! [`RedditClient`] implements both over `reqwest`. Tests substitute their
//! own implementations.
//!
//! # Endpoints
//!
//! | Step | Request |
//! |------|---------|
//! | Token | `POST {token_url}` with Basic auth and `grant_type=client_credentials` |
//! | Thread | `GET {api_base}/r/{subreddit}/comments/{post_id}.json` with Bearer auth |

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;

use crate::config::RedditConfig;
use crate::error::ExtractError;

static POST_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/r/([A-Za-z0-9_]+)/comments/([A-Za-z0-9_]+)").unwrap());

/// Reddit "script"/"web" app credentials supplied with each request.
///
/// Missing fields deserialize as empty and are caught by
/// [`validate`](Credentials::validate). Never logged; the `Debug` impl
/// redacts the secret.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

impl Credentials {
    /// Every field must be non-blank.
    pub fn validate(&self) -> Result<(), ExtractError> {
        for (name, value) in [
            ("Client ID", &self.client_id),
            ("Client Secret", &self.client_secret),
            ("Username", &self.username),
        ] {
            if value.trim().is_empty() {
                return Err(ExtractError::validation(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

/// The post a thread is fetched for, parsed from its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTarget {
    pub subreddit: String,
    pub post_id: String,
}

impl PostTarget {
    /// Parse a post URL such as
    /// `https://www.reddit.com/r/rust/comments/abc123/some_title/`.
    pub fn parse(post_url: &str) -> Result<Self, ExtractError> {
        let url = reqwest::Url::parse(post_url.trim())
            .map_err(|_| ExtractError::validation("Must be a valid URL"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExtractError::validation("Must be a valid URL"));
        }

        let caps = POST_PATH
            .captures(url.path())
            .ok_or_else(|| ExtractError::validation("Must be a valid Reddit post URL"))?;

        Ok(Self {
            subreddit: caps[1].to_string(),
            post_id: caps[2].to_string(),
        })
    }
}

/// Exchanges credentials for an opaque bearer token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self, credentials: &Credentials) -> Result<String, ExtractError>;
}

/// Fetches the raw two-listing comment payload for a post.
#[async_trait]
pub trait ThreadSource: Send + Sync {
    async fn fetch_thread(&self, target: &PostTarget, token: &str) -> Result<Value, ExtractError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

/// `reqwest`-backed client for the Reddit OAuth API.
#[derive(Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    token_url: String,
    api_base: String,
    user_agent: String,
}

impl RedditClient {
    pub fn new(config: &RedditConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            token_url: config.token_url.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    fn thread_url(&self, target: &PostTarget) -> String {
        format!(
            "{}/r/{}/comments/{}.json",
            self.api_base, target.subreddit, target.post_id
        )
    }
}

fn status_detail(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl TokenProvider for RedditClient {
    async fn access_token(&self, credentials: &Credentials) -> Result<String, ExtractError> {
        tracing::debug!(url = %self.token_url, "requesting access token");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(
                reqwest::header::USER_AGENT,
                format!("{} (by u/{})", self.user_agent, credentials.username),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ExtractError::Authentication {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "token exchange rejected");
            return Err(ExtractError::Authentication {
                status: Some(status.as_u16()),
                message: status_detail(status),
            });
        }

        let body: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| ExtractError::Authentication {
                    status: Some(status.as_u16()),
                    message: format!("invalid token response: {}", e),
                })?;

        match (body.access_token, body.error) {
            (Some(token), None) if !token.is_empty() => Ok(token),
            (_, Some(error)) => Err(ExtractError::Authentication {
                status: Some(status.as_u16()),
                message: error,
            }),
            _ => Err(ExtractError::Authentication {
                status: Some(status.as_u16()),
                message: "token response has no access_token".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ThreadSource for RedditClient {
    async fn fetch_thread(&self, target: &PostTarget, token: &str) -> Result<Value, ExtractError> {
        let url = self.thread_url(target);
        tracing::debug!(url = %url, "fetching comment listing");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ExtractError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "comment listing request failed");
            return Err(ExtractError::Fetch(status_detail(status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ExtractError::Fetch(format!("invalid JSON in response: {}", e)))
    }
}
