//! FootballDecoded CLI - Newsletter management tools.
//!
//! # Usage
//!
//! ```bash
//! # Show subscriber statistics
//! fd-cli newsletter stats
//!
//! # Export confirmed emails to local files
//! fd-cli newsletter export --out-dir exports
//!
//! # Check connectivity to the API
//! fd-cli newsletter test
//! ```
//!
//! All commands talk to the running site over HTTP. The target is taken
//! from `--base-url`, falling back to the `SITE_BASE_URL` environment
//! variable, then `http://localhost:3000`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fd-cli")]
#[command(author, version, about = "FootballDecoded CLI tools")]
struct Cli {
    /// Base URL of the running site
    #[arg(long, env = "SITE_BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the newsletter subscriber list
    Newsletter {
        #[command(subcommand)]
        action: NewsletterAction,
    },
}

#[derive(Subcommand)]
enum NewsletterAction {
    /// Show subscriber statistics
    Stats,
    /// Export confirmed emails to local files
    Export {
        /// Directory the export files are written to
        #[arg(long, default_value = "exports")]
        out_dir: std::path::PathBuf,
    },
    /// Check connectivity to the API
    Test,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = cli.base_url.trim_end_matches('/');

    match cli.command {
        Commands::Newsletter { action } => match action {
            NewsletterAction::Stats => commands::newsletter::stats(base_url).await?,
            NewsletterAction::Export { out_dir } => {
                commands::newsletter::export(base_url, &out_dir).await?;
            }
            NewsletterAction::Test => commands::newsletter::test(base_url).await?,
        },
    }
    Ok(())
}
