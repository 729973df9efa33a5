//! HTTP API for the extraction wizard.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/api/validate-credentials` | Run the token exchange only |
//! | `POST` | `/api/extract-comments` | Extract a post's comments into a new job |
//! | `GET`  | `/api/jobs/{id}` | Job status, without payloads |
//! | `GET`  | `/api/download/{id}/json` | JSON artifact of a completed job |
//! | `GET`  | `/api/download/{id}/text` | Text artifact of a completed job |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "Must be a valid Reddit post URL" } }
//! ```
//!
//! Error codes: `bad_request` (400), `unauthorized` (401), `not_found` (404),
//! `not_ready` (404), `upstream_error` (502), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the wizard can be
//! served from a different origin during development.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use threadpull_core::format::suggested_filename;
use threadpull_core::models::{ExtractionJob, JobStatus};
use threadpull_core::store::memory::InMemoryJobStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::ExtractError;
use crate::extract::{ExtractionSummary, Extractor};
use crate::reddit::{Credentials, RedditClient};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    extractor: Extractor,
}

/// Builds an [`Extractor`] backed by the live Reddit API and an
/// in-memory job store.
pub fn default_extractor(config: &Config) -> anyhow::Result<Extractor> {
    let client = Arc::new(RedditClient::new(&config.reddit)?);
    Ok(Extractor::new(
        Arc::new(InMemoryJobStore::new()),
        client.clone(),
        client,
        config.extraction.limits(),
    ))
}

/// Starts the HTTP server on `[server].bind` against the live Reddit API.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let extractor = default_extractor(config)?;
    run_server_with(config, extractor).await
}

/// Starts the HTTP server with a caller-supplied [`Extractor`].
///
/// Used by tests to swap in fake Reddit collaborators.
pub async fn run_server_with(config: &Config, extractor: Extractor) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(extractor)).await?;
    Ok(())
}

/// The complete route table.
pub fn router(extractor: Extractor) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/validate-credentials", post(handle_validate_credentials))
        .route("/api/extract-comments", post(handle_extract_comments))
        .route("/api/jobs/{id}", get(handle_get_job))
        .route("/api/download/{id}/{format}", get(handle_download))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { extractor })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

/// Job ids are positive integers; anything else names no job.
fn parse_job_id(raw: &str) -> Result<u64, AppError> {
    raw.parse::<u64>()
        .map_err(|_| not_found(format!("no job with id {}", raw)))
}

fn not_ready(job: &ExtractionJob) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_ready",
        message: format!("job {} is {}, not completed", job.id, job.status),
    }
}

/// Maps the extraction taxonomy onto HTTP status codes.
fn classify(err: &ExtractError) -> (StatusCode, &'static str) {
    match err {
        ExtractError::Validation(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        ExtractError::Authentication { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
        ExtractError::Fetch(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
        ExtractError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        let (status, code) = classify(&err);
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "job store failure");
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal",
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /api/validate-credentials ============

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Returns `{ "valid": true }`, or `{ "valid": false, "error": ... }` with
/// 400 for blank fields and 401 when Reddit rejects the credentials.
async fn handle_validate_credentials(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Response {
    let credentials = match body {
        Ok(Json(credentials)) => credentials,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidateResponse {
                    valid: false,
                    error: Some(rejection.body_text()),
                }),
            )
                .into_response();
        }
    };

    match state.extractor.check_credentials(&credentials).await {
        Ok(()) => Json(ValidateResponse {
            valid: true,
            error: None,
        })
        .into_response(),
        Err(err) => {
            let (status, _) = classify(&err);
            (
                status,
                Json(ValidateResponse {
                    valid: false,
                    error: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}

// ============ POST /api/extract-comments ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest {
    #[serde(default)]
    post_url: String,
    #[serde(flatten)]
    credentials: Credentials,
}

#[derive(Serialize)]
struct ExtractResponse {
    success: bool,
    #[serde(flatten)]
    summary: ExtractionSummary,
}

async fn handle_extract_comments(
    State(state): State<AppState>,
    body: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let Json(req) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let summary = state
        .extractor
        .extract(&req.post_url, &req.credentials)
        .await?;
    Ok(Json(ExtractResponse {
        success: true,
        summary,
    }))
}

// ============ GET /api/jobs/{id} ============

/// Job status without the (potentially large) payloads.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobView {
    id: u64,
    post_url: String,
    status: JobStatus,
    comment_count: Option<usize>,
    post_title: Option<String>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<ExtractionJob> for JobView {
    fn from(job: ExtractionJob) -> Self {
        Self {
            post_title: job.json_data.as_ref().map(|p| p.post.title.clone()),
            id: job.id,
            post_url: job.post_url,
            status: job.status,
            comment_count: job.comment_count,
            error: job.error,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobView>, AppError> {
    let id = parse_job_id(&id)?;
    let job = state.extractor.store().get(id).await?.ok_or_else(|| {
        tracing::debug!(job_id = id, "job not found");
        not_found(format!("no job with id {}", id))
    })?;
    Ok(Json(job.into()))
}

// ============ GET /api/download/{id}/{format} ============

async fn handle_download(
    State(state): State<AppState>,
    Path((id, format)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if format != "json" && format != "text" {
        return Err(not_found(format!("unknown download format: {}", format)));
    }
    let id = parse_job_id(&id)?;

    let job = state.extractor.store().get(id).await?.ok_or_else(|| {
        tracing::debug!(job_id = id, "download for unknown job");
        not_found(format!("no job with id {}", id))
    })?;

    let (payload, text) = job.artifacts().ok_or_else(|| not_ready(&job))?;
    let title = Some(payload.post.title.as_str());

    let (content_type, extension, body) = if format == "json" {
        let body = serde_json::to_string_pretty(payload).map_err(anyhow::Error::from)?;
        ("application/json", "json", body)
    } else {
        ("text/plain; charset=utf-8", "txt", text.to_string())
    };

    let filename = suggested_filename(title, id, extension);
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
