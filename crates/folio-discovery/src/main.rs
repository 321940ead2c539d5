// crates/folio-discovery/src/main.rs
// Folio - tag filtering and full-text search from the command line

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use folio::config::FolioConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "folio=warn",
        1 => "folio=debug",
        _ => "folio=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = FolioConfig::load();
    let validation = config.validate();
    for issue in validation.warnings() {
        warn!(key = issue.key, "{}", issue.message);
    }

    match cli.command {
        Commands::Filter {
            section,
            items,
            url,
            toggles,
            clear,
        } => {
            cli::run_filter(&config, &section, &items, url, &toggles, clear).await?;
        }
        Commands::Search { index, max, query } => {
            if !validation.is_valid() {
                anyhow::bail!("Invalid configuration:\n{}", validation.report());
            }
            cli::run_search(&config, &index, max, &query).await?;
        }
        Commands::Config => {
            cli::run_config(&config)?;
        }
    }

    Ok(())
}
