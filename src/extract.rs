//! Extraction orchestrator.
//!
//! Drives one extraction request from submission to downloadable artifacts:
//!
//! ```text
//! validate ─▶ create job ─▶ processing ─▶ token ─▶ fetch ─▶ decode
//!                                                              │
//!                       completed ◀─ text ◀─ JSON payload ◀─ flatten
//! ```
//!
//! Validation failures reject the request before a job exists. Once a job
//! has been created, any failure marks it `failed` with the error message
//! before the error is returned, so no job is left in `processing`.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use threadpull_core::flatten::FlattenLimits;
use threadpull_core::format::format_as_text;
use threadpull_core::models::{ExportPayload, JobUpdate};
use threadpull_core::store::JobStore;
use threadpull_core::thread::RawThread;

use crate::error::ExtractError;
use crate::reddit::{Credentials, PostTarget, ThreadSource, TokenProvider};

/// Returned to the caller when an extraction completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub job_id: u64,
    pub comment_count: usize,
    pub post_title: String,
}

/// Coordinates the job store with the Reddit collaborators.
#[derive(Clone)]
pub struct Extractor {
    store: Arc<dyn JobStore>,
    tokens: Arc<dyn TokenProvider>,
    threads: Arc<dyn ThreadSource>,
    limits: FlattenLimits,
}

impl Extractor {
    pub fn new(
        store: Arc<dyn JobStore>,
        tokens: Arc<dyn TokenProvider>,
        threads: Arc<dyn ThreadSource>,
        limits: FlattenLimits,
    ) -> Self {
        Self {
            store,
            tokens,
            threads,
            limits,
        }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Check credentials by running the token exchange alone.
    pub async fn check_credentials(&self, credentials: &Credentials) -> Result<(), ExtractError> {
        credentials.validate()?;
        self.tokens.access_token(credentials).await?;
        Ok(())
    }

    /// Extract the comment thread at `post_url` into a new job.
    pub async fn extract(
        &self,
        post_url: &str,
        credentials: &Credentials,
    ) -> Result<ExtractionSummary, ExtractError> {
        let target = PostTarget::parse(post_url)?;
        credentials.validate()?;

        let job = self.store.create(post_url.trim()).await?;
        tracing::info!(
            job_id = job.id,
            subreddit = %target.subreddit,
            post_id = %target.post_id,
            "extraction job created"
        );

        match self.run(job.id, &target, credentials).await {
            Ok(summary) => {
                tracing::info!(
                    job_id = job.id,
                    comments = summary.comment_count,
                    "extraction completed"
                );
                Ok(summary)
            }
            Err(err) => {
                tracing::warn!(job_id = job.id, error = %err, "extraction failed");
                if let Err(store_err) = self
                    .store
                    .update(job.id, JobUpdate::failed(err.to_string(), Utc::now()))
                    .await
                {
                    tracing::error!(job_id = job.id, error = %store_err, "could not mark job failed");
                }
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        job_id: u64,
        target: &PostTarget,
        credentials: &Credentials,
    ) -> Result<ExtractionSummary, ExtractError> {
        self.store.update(job_id, JobUpdate::processing()).await?;

        let token = self.tokens.access_token(credentials).await?;
        let raw = self.threads.fetch_thread(target, &token).await?;
        let thread = RawThread::from_value(raw).map_err(|e| ExtractError::Fetch(e.to_string()))?;

        let flattened = thread.flatten(&self.limits);
        if flattened.truncated {
            tracing::warn!(
                job_id,
                kept = flattened.comments.len(),
                max_depth = self.limits.max_depth,
                max_comments = self.limits.max_comments,
                "comment tree exceeded limits, output truncated"
            );
        }

        let text = format_as_text(&thread.post, &flattened.comments);
        let post_title = thread.post.title.clone();
        let payload = ExportPayload::new(thread.post, flattened.comments, Utc::now());
        let comment_count = payload.total_comments;

        self.store
            .update(job_id, JobUpdate::completed(payload, text, Utc::now()))
            .await?;

        Ok(ExtractionSummary {
            job_id,
            comment_count,
            post_title,
        })
    }
}
