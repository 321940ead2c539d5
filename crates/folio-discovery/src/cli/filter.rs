// crates/folio-discovery/src/cli/filter.rs
// Filter command: replay tag toggles against an item list

use anyhow::{Context, Result};
use folio::config::FolioConfig;
use folio::filter::{FilterSession, SectionType};
use folio::platform::{FilterPage, ImmediateFrames, MemoryItem, MemoryPage};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ItemRecord {
    id: String,
    /// Raw comma-separated tag list, as it would appear in the page markup
    #[serde(default)]
    tags: String,
}

pub async fn run_filter(
    config: &FolioConfig,
    section: &str,
    items_path: &Path,
    url: Option<String>,
    toggles: &[String],
    clear: bool,
) -> Result<()> {
    let section: SectionType = section.parse()?;
    let raw = tokio::fs::read_to_string(items_path)
        .await
        .with_context(|| format!("reading {}", items_path.display()))?;
    let records: Vec<ItemRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", items_path.display()))?;

    let location = url.unwrap_or_else(|| format!("http://localhost/{}/", section));

    // One control per distinct tag found on the items
    let tags: BTreeSet<String> = records
        .iter()
        .flat_map(|record| folio::filter::parse_tag_list(&record.tags))
        .collect();
    let items: Vec<Arc<MemoryItem>> = records
        .iter()
        .map(|record| MemoryItem::tagged(record.id.clone(), &section, &record.tags))
        .collect();
    debug!(items = items.len(), tags = tags.len(), "Loaded filter items");

    let page = Arc::new(
        MemoryPage::new(location)
            .with_controls(tags)
            .with_items(items),
    );

    let session = FilterSession::builder(section, page.clone())
        .config(&config.filter)
        .frames(Arc::new(ImmediateFrames))
        .start()?;

    for tag in toggles {
        session.toggle(tag);
    }
    if clear {
        session.clear_all();
    }
    session.flush_url();

    for item in page.memory_items().iter().filter(|item| item.is_visible()) {
        println!("{}", item.id());
    }
    println!();
    println!("{}", page.count_text());
    println!("{}", page.location());

    session.destroy();
    Ok(())
}
