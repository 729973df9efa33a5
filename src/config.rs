use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use threadpull_core::flatten::FlattenLimits;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedditConfig {
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_token_url() -> String {
    "https://www.reddit.com/api/v1/access_token".to_string()
}
fn default_api_base() -> String {
    "https://oauth.reddit.com".to_string()
}
fn default_user_agent() -> String {
    format!("threadpull/{}", env!("CARGO_PKG_VERSION"))
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let limits = FlattenLimits::default();
        Self {
            max_depth: limits.max_depth,
            max_comments: limits.max_comments,
        }
    }
}

fn default_max_depth() -> usize {
    FlattenLimits::default().max_depth
}
fn default_max_comments() -> usize {
    FlattenLimits::default().max_comments
}

impl ExtractionConfig {
    pub fn limits(&self) -> FlattenLimits {
        FlattenLimits {
            max_depth: self.max_depth,
            max_comments: self.max_comments,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the built-in defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    for (key, value) in [
        ("reddit.token_url", &config.reddit.token_url),
        ("reddit.api_base", &config.reddit.api_base),
    ] {
        let url = reqwest::Url::parse(value)
            .with_context(|| format!("{} is not a valid URL: '{}'", key, value))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("{} must be an http(s) URL, got '{}'", key, value);
        }
    }

    if config.reddit.timeout_secs == 0 {
        anyhow::bail!("reddit.timeout_secs must be > 0");
    }

    if config.extraction.max_depth == 0 {
        anyhow::bail!("extraction.max_depth must be > 0");
    }
    if config.extraction.max_comments == 0 {
        anyhow::bail!("extraction.max_comments must be > 0");
    }

    Ok(())
}
