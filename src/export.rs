//! One-off extraction from the command line.
//!
//! Runs the same [`Extractor`] the HTTP API uses, against a throwaway
//! in-memory job store, then writes the artifacts to disk (or stdout).
//! Credentials come from the `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET`
//! and `REDDIT_USERNAME` environment variables.

use anyhow::{bail, Context, Result};
use std::path::Path;
use threadpull_core::format::suggested_filename;

use crate::config::Config;
use crate::extract::Extractor;
use crate::reddit::Credentials;
use crate::server::default_extractor;

/// Which artifacts to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Text,
    Both,
}

/// Read app credentials from the environment.
pub fn credentials_from_env() -> Result<Credentials> {
    let var = |name: &str| match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{} environment variable not set", name),
    };
    Ok(Credentials {
        client_id: var("REDDIT_CLIENT_ID")?,
        client_secret: var("REDDIT_CLIENT_SECRET")?,
        username: var("REDDIT_USERNAME")?,
    })
}

/// Check credentials from the environment against the token endpoint.
pub async fn run_check_credentials(config: &Config) -> Result<()> {
    let credentials = credentials_from_env()?;
    default_extractor(config)?
        .check_credentials(&credentials)
        .await?;
    println!("ok");
    Ok(())
}

/// Extract `post_url` and write the requested artifacts.
///
/// With `output_dir`, files are named after the post title. Without it,
/// a single format is printed to stdout; `both` requires a directory.
pub async fn run_extract(
    config: &Config,
    post_url: &str,
    format: ExportFormat,
    output_dir: Option<&Path>,
) -> Result<()> {
    if output_dir.is_none() && format == ExportFormat::Both {
        bail!("--format both requires --output-dir");
    }
    let credentials = credentials_from_env()?;
    let extractor = default_extractor(config)?;
    extract_to(&extractor, post_url, &credentials, format, output_dir).await
}

/// Body of [`run_extract`] with the collaborators supplied by the caller.
pub async fn extract_to(
    extractor: &Extractor,
    post_url: &str,
    credentials: &Credentials,
    format: ExportFormat,
    output_dir: Option<&Path>,
) -> Result<()> {
    let summary = extractor.extract(post_url, credentials).await?;
    let job = extractor
        .store()
        .get(summary.job_id)
        .await?
        .with_context(|| format!("job {} vanished after extraction", summary.job_id))?;
    let (payload, text) = job
        .artifacts()
        .with_context(|| format!("job {} has no artifacts", job.id))?;

    let json = serde_json::to_string_pretty(payload)?;
    let title = Some(summary.post_title.as_str());

    let outputs: Vec<(&str, &str)> = match format {
        ExportFormat::Json => vec![("json", json.as_str())],
        ExportFormat::Text => vec![("txt", text)],
        ExportFormat::Both => vec![("json", json.as_str()), ("txt", text)],
    };

    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for (extension, body) in outputs {
                let path = dir.join(suggested_filename(title, job.id, extension));
                std::fs::write(&path, body)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Wrote {}", path.display());
            }
        }
        None => {
            for (_, body) in outputs {
                print!("{}", body);
            }
        }
    }

    eprintln!(
        "Extracted {} comments from \"{}\"",
        summary.comment_count, summary.post_title
    );
    Ok(())
}
