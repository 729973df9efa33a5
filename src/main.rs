//! # threadpull CLI
//!
//! ## Usage
//!
//! ```bash
//! threadpull --config ./config/threadpull.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `threadpull serve` | Start the HTTP API used by the browser wizard |
//! | `threadpull extract <url>` | Extract one post's comments to JSON and/or text |
//! | `threadpull check-credentials` | Verify Reddit app credentials |
//!
//! `extract` and `check-credentials` read `REDDIT_CLIENT_ID`,
//! `REDDIT_CLIENT_SECRET` and `REDDIT_USERNAME` from the environment.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use threadpull::config;
use threadpull::export::{self, ExportFormat};
use threadpull::server;

/// Export a Reddit post's comment thread as JSON or text.
#[derive(Parser)]
#[command(
    name = "threadpull",
    about = "Export a Reddit post's comment thread as JSON or indented plain text",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Built-in defaults are used when the file does not exist.
    #[arg(long, global = true, default_value = "./config/threadpull.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    ///
    /// Binds to `[server].bind` and keeps extraction jobs in memory for
    /// the lifetime of the process.
    Serve,

    /// Extract the comments of one post.
    Extract {
        /// Reddit post URL, e.g. `https://www.reddit.com/r/rust/comments/abc123/`.
        post_url: String,

        /// Which artifact(s) to produce. Defaults to `both` with
        /// `--output-dir` and `text` otherwise.
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Directory to write files into. Without it, output goes to stdout.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Run the OAuth token exchange and report whether it succeeded.
    CheckCredentials,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    threadpull::init_tracing();

    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Extract {
            post_url,
            format,
            output_dir,
        } => {
            let format = format.unwrap_or(match output_dir {
                Some(_) => ExportFormat::Both,
                None => ExportFormat::Text,
            });
            export::run_extract(&cfg, &post_url, format, output_dir.as_deref()).await?;
        }
        Commands::CheckCredentials => {
            export::run_check_credentials(&cfg).await?;
        }
    }

    Ok(())
}
