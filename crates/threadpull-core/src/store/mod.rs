//! Job store abstraction for threadpull.
//!
//! The [`JobStore`] trait owns extraction job records: it allocates ids,
//! hands out snapshots, and merges partial updates. The orchestrator only
//! talks to this trait, so a persistent backend can replace the bundled
//! [`memory::InMemoryJobStore`] without touching extraction logic.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ExtractionJob, JobUpdate};

/// Abstract storage backend for extraction jobs.
///
/// Unknown ids are a normal outcome and are reported as `Ok(None)`;
/// `Err` is reserved for backend failures.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`create`](JobStore::create) | Allocate a new `pending` job |
/// | [`get`](JobStore::get) | Snapshot of a job by id |
/// | [`update`](JobStore::update) | Merge fields into a job, returning the new snapshot |
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a `pending` job for `post_url` with the next id.
    async fn create(&self, post_url: &str) -> Result<ExtractionJob>;

    /// Current snapshot of a job.
    async fn get(&self, id: u64) -> Result<Option<ExtractionJob>>;

    /// Merge `update` into a job. Fields left `None` keep their value.
    async fn update(&self, id: u64, update: JobUpdate) -> Result<Option<ExtractionJob>>;
}
