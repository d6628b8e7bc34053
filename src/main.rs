//! CLI entry point for content-indexer

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_indexer::{commands, Site};

#[derive(Parser)]
#[command(name = "content-indexer")]
#[command(version)]
#[command(about = "Index Markdown posts by slug and tag from their front-matter", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Configuration file (defaults to _config.yml in the base directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts or tags
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Content directory
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single post by slug
    Show {
        /// Content directory
        dir: PathBuf,

        /// Slug of the post
        slug: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List posts carrying a tag
    Tag {
        /// Content directory
        dir: PathBuf,

        /// Tag to look up (case-insensitive)
        tag: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate every post in a directory
    Check {
        /// Content directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Reload the catalog whenever content changes
    Watch {
        /// Content directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "content_indexer=debug,info"
    } else {
        "content_indexer=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    let site = Site::new(&base_dir, cli.config.as_deref())
        .with_context(|| format!("Failed to configure site in {:?}", base_dir))?;

    match cli.command {
        Commands::List { r#type, dir, json } => {
            commands::list::run(&site, &dir, &r#type, json)?;
        }

        Commands::Show { dir, slug, json } => {
            commands::show::run(&site, &dir, &slug, json)?;
        }

        Commands::Tag { dir, tag, json } => {
            commands::tag::run(&site, &dir, &tag, json)?;
        }

        Commands::Check { dir } => {
            commands::check::run(&site, &dir)?;
        }

        Commands::Watch { dir } => {
            tokio::task::spawn_blocking(move || commands::watch::run(&site, &dir))
                .await
                .context("Watch task aborted")??;
        }
    }

    Ok(())
}
