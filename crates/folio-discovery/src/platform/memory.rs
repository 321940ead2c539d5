// crates/folio-discovery/src/platform/memory.rs
// In-memory page: a FilterPage without a browser, for the CLI and tests

use super::{FilterControl, FilterPage, ItemElement, TextElement};
use crate::filter::SectionType;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
pub struct MemoryControl {
    tag: Option<String>,
    pressed: AtomicBool,
    label_active: AtomicBool,
}

impl MemoryControl {
    pub fn new(tag: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            tag: Some(tag.into()),
            pressed: AtomicBool::new(false),
            label_active: AtomicBool::new(false),
        })
    }

    /// A control whose tag attribute is missing
    pub fn untagged() -> Arc<Self> {
        Arc::new(Self {
            tag: None,
            pressed: AtomicBool::new(false),
            label_active: AtomicBool::new(false),
        })
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::SeqCst)
    }

    /// Value the pressed-state attribute would carry
    pub fn aria_pressed(&self) -> &'static str {
        if self.is_pressed() { "true" } else { "false" }
    }

    pub fn label_active(&self) -> bool {
        self.label_active.load(Ordering::SeqCst)
    }
}

impl FilterControl for MemoryControl {
    fn tag_id(&self) -> Option<String> {
        self.tag.clone()
    }

    fn set_active(&self, active: bool) {
        self.pressed.store(active, Ordering::SeqCst);
        self.label_active.store(active, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct MemoryItem {
    id: String,
    attributes: BTreeMap<String, String>,
    visible: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
            visible: AtomicBool::new(true),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Item carrying the section's comma-joined tag attribute
    pub fn tagged(id: impl Into<String>, section: &SectionType, tags: &str) -> Arc<Self> {
        Arc::new(Self::new(id).with_attribute(section.tag_attribute(), tags))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Number of visibility writes applied to this element
    pub fn visibility_writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ItemElement for MemoryItem {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct MemoryText {
    text: Mutex<String>,
}

impl MemoryText {
    pub fn text(&self) -> String {
        self.text.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TextElement for MemoryText {
    fn set_text(&self, text: &str) {
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
    }
}

/// A single section listing page held in memory
#[derive(Debug)]
pub struct MemoryPage {
    controls: Option<Vec<Arc<MemoryControl>>>,
    clear_control: bool,
    count: Option<Arc<MemoryText>>,
    items: Vec<Arc<MemoryItem>>,
    location: Mutex<String>,
    replaced: Mutex<Vec<String>>,
}

impl MemoryPage {
    /// Page with every anchor present and no controls or items yet
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            controls: Some(Vec::new()),
            clear_control: true,
            count: Some(Arc::new(MemoryText::default())),
            items: Vec::new(),
            location: Mutex::new(location.into()),
            replaced: Mutex::new(Vec::new()),
        }
    }

    pub fn with_controls<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let controls = self.controls.get_or_insert_with(Vec::new);
        controls.extend(tags.into_iter().map(MemoryControl::new));
        self
    }

    pub fn with_control(mut self, control: Arc<MemoryControl>) -> Self {
        self.controls.get_or_insert_with(Vec::new).push(control);
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = Arc<MemoryItem>>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn without_container(mut self) -> Self {
        self.controls = None;
        self
    }

    pub fn without_clear_control(mut self) -> Self {
        self.clear_control = false;
        self
    }

    pub fn without_results_count(mut self) -> Self {
        self.count = None;
        self
    }

    pub fn control(&self, tag: &str) -> Option<Arc<MemoryControl>> {
        self.controls
            .as_ref()?
            .iter()
            .find(|c| c.tag.as_deref() == Some(tag))
            .cloned()
    }

    pub fn item(&self, id: &str) -> Option<Arc<MemoryItem>> {
        self.items.iter().find(|i| i.id == id).cloned()
    }

    pub fn memory_items(&self) -> &[Arc<MemoryItem>] {
        &self.items
    }

    /// Current results-count text (empty when the anchor is absent)
    pub fn count_text(&self) -> String {
        self.count.as_ref().map(|c| c.text()).unwrap_or_default()
    }

    /// Every URL written through `replace_location`, oldest first
    pub fn replaced_urls(&self) -> Vec<String> {
        self.replaced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FilterPage for MemoryPage {
    fn filter_controls(&self) -> Option<Vec<Arc<dyn FilterControl>>> {
        self.controls.as_ref().map(|controls| {
            controls
                .iter()
                .map(|c| c.clone() as Arc<dyn FilterControl>)
                .collect()
        })
    }

    fn has_clear_control(&self) -> bool {
        self.clear_control
    }

    fn results_count(&self) -> Option<Arc<dyn TextElement>> {
        self.count.as_ref().map(|c| c.clone() as Arc<dyn TextElement>)
    }

    fn items(&self, _section: &SectionType) -> Vec<Arc<dyn ItemElement>> {
        self.items
            .iter()
            .map(|i| i.clone() as Arc<dyn ItemElement>)
            .collect()
    }

    fn location(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_location(&self, url: &str) {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = url.to_string();
        self.replaced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}
