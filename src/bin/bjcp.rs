use anyhow::{bail, Context, Result};
use bjcp_migrate::database_ops::populate::{self, PopulateConfig};
use bjcp_migrate::migration::{self, GenerateConfig};
use bjcp_migrate::util::env;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bjcp", version, about = "BJCP style guideline import tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Render the flat BJCP dataset into a standalone SQL migration script
    GenerateScript {
        /// Flat JSON list of styles
        #[arg(long, default_value = "database/bjcp-data.json")]
        input: PathBuf,
        /// Where to write the generated script
        #[arg(
            long,
            default_value = "database/migrations/037_populate_complete_bjcp_beer_styles.sql"
        )]
        output: PathBuf,
    },
    /// Populate the normalized BJCP tables from a BeerJSON document
    Populate {
        /// BeerJSON document of the form {"beerjson": {"styles": [...]}}
        #[arg(long, default_value = "database/bjcp2.json")]
        input: PathBuf,
        /// Optional override for the database URL
        #[arg(long)]
        db_url: Option<String>,
        /// Max pool connections
        #[arg(long, default_value_t = 5)]
        max_connections: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env::init_env();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateScript { input, output } => {
            migration::run(&GenerateConfig { input, output })?;
            info!("generate-script: completed successfully");
        }
        Commands::Populate {
            input,
            db_url,
            max_connections,
        } => {
            let database_url = resolve_database_url(db_url)?;
            let summary = populate::run(&PopulateConfig {
                input,
                database_url,
                max_connections,
            })
            .await?;
            info!(
                styles = summary.styles,
                "populate: completed successfully"
            );
        }
    }

    Ok(())
}

fn resolve_database_url(db_url: Option<String>) -> Result<String> {
    if let Some(url) = db_url {
        let trimmed = url.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
        bail!("--db-url was set but empty");
    }
    env::db_url().context("resolve_database_url: set DATABASE_URL or pass --db-url")
}
