//! # threadpull
//!
//! Export a Reddit post's comment thread as structured JSON or as an
//! indented plain-text transcript.
//!
//! threadpull exchanges a user's Reddit app credentials for a bearer token,
//! fetches the comment listing for one post, flattens the reply tree into
//! an ordered list with explicit parent ids and depths, and keeps the
//! result in an extraction job until it is downloaded.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Reddit API  │──▶│  Extractor   │──▶│  Job store   │
//! │ token+thread │   │ flatten+text │   │  (in-memory) │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!                      ┌───────────────────────┤
//!                      ▼                       ▼
//!                 ┌──────────┐           ┌──────────┐
//!                 │   CLI    │           │   HTTP   │
//!                 │ extract  │           │  wizard  │
//!                 └──────────┘           └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! threadpull serve                  # start the HTTP API
//! REDDIT_CLIENT_ID=... REDDIT_CLIENT_SECRET=... REDDIT_USERNAME=... \
//!   threadpull extract https://www.reddit.com/r/rust/comments/abc123/ --output-dir out/
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Extraction error taxonomy |
//! | [`reddit`] | Token exchange and comment listing collaborators |
//! | [`extract`] | Extraction orchestrator |
//! | [`export`] | Command-line extraction to files |
//! | [`server`] | HTTP API |
//!
//! Flattening, text formatting, and the job store live in
//! [`threadpull_core`], re-exported here as [`core`].

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod reddit;
pub mod server;

pub use threadpull_core as core;

use tracing_subscriber::EnvFilter;

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "threadpull=info,tower_http=info";

/// Install the global `tracing` subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
