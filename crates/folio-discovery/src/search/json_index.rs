// crates/folio-discovery/src/search/json_index.rs
// In-memory index read from a prebuilt JSON document list

use super::highlight::highlight;
use super::index::{IndexHandle, IndexLoader, ResultRef};
use crate::error::{DiscoveryError, Result};
use crate::utils::{tokenize, word_count, word_window};
use async_trait::async_trait;
use folio_types::ResultPayload;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Words of page content shown around the first match
const EXCERPT_WORDS: usize = 30;
const TITLE_WEIGHT: f32 = 2.0;

/// One page as written by the site build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,
}

/// Reads a `[IndexDocument]` JSON file. One `load` is one attempt.
#[derive(Debug, Clone)]
pub struct JsonIndexLoader {
    path: PathBuf,
}

impl JsonIndexLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IndexLoader for JsonIndexLoader {
    async fn load(&self) -> Result<Arc<dyn IndexHandle>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DiscoveryError::IndexLoad(format!("{}: {}", self.path.display(), e)))?;

        let documents: Vec<IndexDocument> = serde_json::from_str(&raw)
            .map_err(|e| DiscoveryError::IndexLoad(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), documents = documents.len(), "Parsed search index");
        Ok(Arc::new(JsonIndex::from_documents(documents)))
    }
}

struct Entry {
    doc: Arc<IndexDocument>,
    title_terms: Vec<String>,
    body_terms: Vec<String>,
}

impl Entry {
    fn score(&self, terms: &[String]) -> f32 {
        TITLE_WEIGHT * hits(&self.title_terms, terms) + hits(&self.body_terms, terms)
    }
}

fn hits(tokens: &[String], terms: &[String]) -> f32 {
    tokens
        .iter()
        .filter(|token| terms.iter().any(|term| token.starts_with(term.as_str())))
        .count() as f32
}

/// Term-frequency ranked index. Query terms match token prefixes so partial
/// input finds whole words; title hits count double.
pub struct JsonIndex {
    entries: Vec<Entry>,
    /// Bumped by every debounced call; a sleeper that wakes to a newer value
    /// was superseded
    generation: AtomicU64,
}

impl JsonIndex {
    pub fn from_documents(documents: Vec<IndexDocument>) -> Self {
        let entries = documents
            .into_iter()
            .map(|doc| Entry {
                title_terms: tokenize(&doc.title),
                body_terms: tokenize(&doc.content),
                doc: Arc::new(doc),
            })
            .collect();

        Self {
            entries,
            generation: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(&self, query: &str) -> Vec<Arc<dyn ResultRef>> {
        let mut terms = tokenize(query);
        terms.sort();
        terms.dedup();
        if terms.is_empty() {
            return Vec::new();
        }
        let terms: Arc<[String]> = terms.into();

        let mut scored: Vec<(f32, &Entry)> = self
            .entries
            .iter()
            .map(|entry| (entry.score(&terms), entry))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score
                .total_cmp(a_score)
                .then_with(|| a.doc.id.cmp(&b.doc.id))
        });

        scored
            .into_iter()
            .map(|(score, entry)| {
                Arc::new(JsonResultRef {
                    doc: entry.doc.clone(),
                    score,
                    query: query.to_string(),
                    terms: terms.clone(),
                }) as Arc<dyn ResultRef>
            })
            .collect()
    }
}

#[async_trait]
impl IndexHandle for JsonIndex {
    async fn search(&self, query: &str) -> Result<Vec<Arc<dyn ResultRef>>> {
        Ok(self.rank(query))
    }

    fn supports_debounce(&self) -> bool {
        true
    }

    async fn debounced_search(
        &self,
        query: &str,
        debounce: Duration,
    ) -> Result<Option<Vec<Arc<dyn ResultRef>>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(debounce).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(None);
        }
        Ok(Some(self.rank(query)))
    }
}

struct JsonResultRef {
    doc: Arc<IndexDocument>,
    score: f32,
    query: String,
    terms: Arc<[String]>,
}

impl JsonResultRef {
    /// Word index of the first content word matching any query term
    fn first_match(&self) -> usize {
        self.doc
            .content
            .split_whitespace()
            .position(|word| {
                tokenize(word)
                    .iter()
                    .any(|token| self.terms.iter().any(|term| token.starts_with(term.as_str())))
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl ResultRef for JsonResultRef {
    fn id(&self) -> &str {
        &self.doc.id
    }

    fn score(&self) -> Option<f32> {
        Some(self.score)
    }

    async fn data(&self) -> Result<ResultPayload> {
        let window = word_window(&self.doc.content, self.first_match(), EXCERPT_WORDS);

        let mut meta = self.doc.meta.clone();
        if !self.doc.title.is_empty() {
            meta.entry("title".to_string())
                .or_insert_with(|| self.doc.title.clone());
        }

        Ok(ResultPayload {
            url: self.doc.url.clone(),
            excerpt: highlight(&window, &self.query),
            word_count: word_count(&self.doc.content),
            meta,
            filters: self.doc.filters.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc(id: &str, title: &str, content: &str) -> IndexDocument {
        IndexDocument {
            id: id.to_string(),
            url: format!("/writing/{id}/"),
            title: title.to_string(),
            content: content.to_string(),
            meta: BTreeMap::new(),
            filters: BTreeMap::new(),
        }
    }

    fn index() -> JsonIndex {
        JsonIndex::from_documents(vec![
            doc("b-notes", "Notes", "rust rust in the body"),
            doc("a-rust", "Rust in production", "lessons learned shipping services"),
            doc("c-python", "Python tooling", "virtualenvs and packaging"),
        ])
    }

    fn ids(refs: &[Arc<dyn ResultRef>]) -> Vec<&str> {
        refs.iter().map(|r| r.id()).collect()
    }

    #[tokio::test]
    async fn test_title_hits_weigh_double_and_ties_by_id() {
        let refs = index().search("rust").await.unwrap();
        // Both score 2.0: one title hit vs two body hits
        assert_eq!(ids(&refs), vec!["a-rust", "b-notes"]);
        assert_eq!(refs[0].score(), Some(2.0));
    }

    #[tokio::test]
    async fn test_prefix_matching() {
        let refs = index().search("pyth").await.unwrap();
        assert_eq!(ids(&refs), vec!["c-python"]);
    }

    #[tokio::test]
    async fn test_no_terms_no_hits() {
        assert!(index().search("  ,, ").await.unwrap().is_empty());
        assert!(index().search("haskell").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_data_highlights_excerpt() {
        let refs = index().search("packaging").await.unwrap();
        let payload = refs[0].data().await.unwrap();

        assert_eq!(payload.url, "/writing/c-python/");
        assert_eq!(payload.excerpt, "virtualenvs and <mark>packaging</mark>");
        assert_eq!(payload.word_count, 3);
        assert_eq!(payload.meta.get("title").map(String::as_str), Some("Python tooling"));
    }

    #[tokio::test]
    async fn test_excerpt_window_around_first_match() {
        let filler = (0..50).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let content = format!("{filler} tokio {filler}");
        let index = JsonIndex::from_documents(vec![doc("long", "", &content)]);

        let refs = index.search("tokio").await.unwrap();
        let payload = refs[0].data().await.unwrap();

        assert!(payload.excerpt.starts_with("... "));
        assert!(payload.excerpt.ends_with(" ..."));
        assert!(payload.excerpt.contains("<mark>tokio</mark>"));
        assert_eq!(payload.word_count, 101);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_call_superseded() {
        let index = index();
        let debounce = Duration::from_millis(100);

        let (first, second) = tokio::join!(index.debounced_search("ru", debounce), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            index.debounced_search("rust", debounce).await
        });

        assert!(first.unwrap().is_none());
        assert_eq!(second.unwrap().map(|refs| refs.len()), Some(2));
    }

    // ═══════════════════════════════════════
    // Loader
    // ═══════════════════════════════════════

    #[tokio::test]
    async fn test_loader_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let docs = vec![doc("a-rust", "Rust in production", "services")];
        write!(file, "{}", serde_json::to_string(&docs).unwrap()).unwrap();

        let index = JsonIndexLoader::new(file.path()).load().await.unwrap();
        let refs = index.search("production").await.unwrap();
        assert_eq!(ids(&refs), vec!["a-rust"]);
    }

    #[tokio::test]
    async fn test_loader_missing_file() {
        let err = JsonIndexLoader::new("/nonexistent/folio-index.json")
            .load()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DiscoveryError::IndexLoad(_)));
    }

    #[tokio::test]
    async fn test_loader_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not a list").unwrap();

        let err = JsonIndexLoader::new(file.path()).load().await.err().unwrap();
        assert!(matches!(err, DiscoveryError::IndexLoad(_)));
    }
}
