//! In-memory [`JobStore`] implementation.
//!
//! Jobs live in a `HashMap` behind a `std::sync::RwLock`; ids come from a
//! counter starting at 1 that is never reused for the lifetime of the store.
//! Terminal jobs are frozen: updating a `completed` or `failed` job is
//! rejected.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;

use crate::models::{ExtractionJob, JobUpdate};

use super::JobStore;

struct Jobs {
    next_id: u64,
    by_id: HashMap<u64, ExtractionJob>,
}

/// Process-local job store.
pub struct InMemoryJobStore {
    jobs: RwLock<Jobs>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(Jobs {
                next_id: 1,
                by_id: HashMap::new(),
            }),
        }
    }

    /// Number of jobs created so far.
    pub fn len(&self) -> Result<usize> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs.by_id.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("job store lock poisoned")
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, post_url: &str) -> Result<ExtractionJob> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        let id = jobs.next_id;
        jobs.next_id += 1;
        let job = ExtractionJob::new(id, post_url, Utc::now());
        jobs.by_id.insert(id, job.clone());
        Ok(job)
    }

    async fn get(&self, id: u64) -> Result<Option<ExtractionJob>> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs.by_id.get(&id).cloned())
    }

    async fn update(&self, id: u64, update: JobUpdate) -> Result<Option<ExtractionJob>> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        let job = match jobs.by_id.get_mut(&id) {
            Some(job) => job,
            None => return Ok(None),
        };
        if job.status.is_terminal() {
            bail!("job {} is already {}", id, job.status);
        }
        job.apply(update);
        Ok(Some(job.clone()))
    }
}
