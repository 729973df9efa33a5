//! Core data models used throughout threadpull.
//!
//! These types represent the post snapshot, the flattened comments, the
//! export payload, and the extraction job record that flow between the
//! flattener, the formatter, and the job store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder author handle used when the source omits one.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Immutable snapshot of the post a thread was extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub author: String,
    pub url: String,
    pub score: i64,
    /// Comment count as reported by Reddit, not the number extracted.
    pub num_comments: i64,
    /// Seconds since the Unix epoch.
    pub created_utc: i64,
}

/// A single flattened comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    /// `None` for top-level comments.
    pub parent_id: Option<String>,
    pub author: String,
    pub body: String,
    pub score: i64,
    pub created_utc: i64,
    /// 0 for top-level comments, otherwise the parent's depth + 1.
    pub depth: usize,
}

/// The JSON document offered for download once a job completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub post: Post,
    pub comments: Vec<Comment>,
    /// ISO-8601 extraction time.
    pub extracted_at: String,
    pub total_comments: usize,
}

impl ExportPayload {
    pub fn new(post: Post, comments: Vec<Comment>, extracted_at: DateTime<Utc>) -> Self {
        let total_comments = comments.len();
        Self {
            post,
            comments,
            extracted_at: extracted_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            total_comments,
        }
    }
}

/// Lifecycle state of an [`ExtractionJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// `completed` and `failed` are terminal: no further mutation happens.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extraction request, from submission to downloadable artifacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionJob {
    pub id: u64,
    pub post_url: String,
    pub status: JobStatus,
    pub comment_count: Option<usize>,
    pub json_data: Option<ExportPayload>,
    pub text_data: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExtractionJob {
    /// A fresh `pending` job with every result field unset.
    pub fn new(id: u64, post_url: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            post_url: post_url.into(),
            status: JobStatus::Pending,
            comment_count: None,
            json_data: None,
            text_data: None,
            error: None,
            created_at,
            completed_at: None,
        }
    }

    /// Both artifacts, if the job completed successfully.
    pub fn artifacts(&self) -> Option<(&ExportPayload, &str)> {
        if self.status != JobStatus::Completed {
            return None;
        }
        match (&self.json_data, &self.text_data) {
            (Some(json), Some(text)) => Some((json, text.as_str())),
            _ => None,
        }
    }

    /// Merge a partial update into this record. Unset fields are left alone.
    pub fn apply(&mut self, update: JobUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(count) = update.comment_count {
            self.comment_count = Some(count);
        }
        if let Some(json) = update.json_data {
            self.json_data = Some(json);
        }
        if let Some(text) = update.text_data {
            self.text_data = Some(text);
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        if let Some(at) = update.completed_at {
            self.completed_at = Some(at);
        }
    }
}

/// Partial set of job fields for [`JobStore::update`](crate::store::JobStore::update).
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub comment_count: Option<usize>,
    pub json_data: Option<ExportPayload>,
    pub text_data: Option<String>,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    pub fn processing() -> Self {
        Self {
            status: Some(JobStatus::Processing),
            ..Default::default()
        }
    }

    pub fn completed(payload: ExportPayload, text: String, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            comment_count: Some(payload.total_comments),
            json_data: Some(payload),
            text_data: Some(text),
            completed_at: Some(at),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error: Some(error.into()),
            completed_at: Some(at),
            ..Default::default()
        }
    }
}
