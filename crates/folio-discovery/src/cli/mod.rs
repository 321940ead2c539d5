// crates/folio-discovery/src/cli/mod.rs
// CLI module for Folio commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod filter;
pub mod search;

pub use config::run_config;
pub use filter::run_filter;
pub use search::run_search;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Tag filtering and full-text search for a portfolio site")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a section listing by tags
    Filter {
        /// Section to filter (writing, work, or any other name)
        #[arg(short, long, default_value = "writing")]
        section: String,

        /// JSON file of items: [{"id": "...", "tags": "a, b"}]
        #[arg(short, long)]
        items: PathBuf,

        /// Page location to bootstrap from (default: http://localhost/<section>/)
        #[arg(short, long)]
        url: Option<String>,

        /// Toggle a tag; repeatable, applied in order
        #[arg(short, long = "toggle")]
        toggles: Vec<String>,

        /// Clear all tags after toggling
        #[arg(long)]
        clear: bool,
    },

    /// Search a prebuilt JSON index
    Search {
        /// JSON file of documents: [{"id", "url", "title", "content", ...}]
        #[arg(short, long, env = "FOLIO_INDEX")]
        index: PathBuf,

        /// Maximum results to show (default from config)
        #[arg(short, long)]
        max: Option<usize>,

        /// Search query
        query: String,
    },

    /// Show the effective configuration
    Config,
}
