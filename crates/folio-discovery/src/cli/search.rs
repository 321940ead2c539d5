// crates/folio-discovery/src/cli/search.rs
// Search command: one query against a JSON index file

use anyhow::Result;
use folio::config::FolioConfig;
use folio::search::{JsonIndexLoader, SearchClient, SearchOptions, format_result_count};
use folio::utils::truncate;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Longest title printed before truncation
const TITLE_WIDTH: usize = 72;

pub async fn run_search(config: &FolioConfig, index: &Path, max: Option<usize>, query: &str) -> Result<()> {
    let loader = Arc::new(JsonIndexLoader::new(index));
    let client = SearchClient::install(loader, config.search.clone());

    let options = SearchOptions {
        max_results: max,
        ..SearchOptions::default()
    };

    let results = match client.perform_search(query, options).await {
        Ok(results) => results,
        Err(e) if e.is_unavailable() => {
            println!("Search is temporarily unavailable");
            info!(error = %e, "Index could not be loaded");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", format_result_count(results.len(), "result"));
    for (rank, result) in results.iter().enumerate() {
        let title = result.title().unwrap_or(result.url.as_str());
        println!();
        println!("{}. {}", rank + 1, truncate(title, TITLE_WIDTH));
        println!("   {}", result.url);
        if !result.excerpt.is_empty() {
            println!("   {}", result.excerpt);
        }
    }

    let stats = client.stats();
    info!(
        searches = stats.searches,
        total_results = stats.total_results,
        failed = stats.failed_searches,
        "Search stats"
    );
    Ok(())
}
