// crates/folio-discovery/src/filter/session.rs
// Filter session: one section's active tags, bound to its page anchors

use super::SectionType;
use super::count::results_count_message;
use super::tags::{TagSet, is_visible, parse_tag_list, serialize_tags};
use super::url::{tags_from_url, url_with_tags};
use crate::analytics::Analytics;
use crate::config::FilterConfig;
use crate::debounce::Debouncer;
use crate::error::{DiscoveryError, Result};
use crate::platform::{FilterControl, FilterPage, FrameScheduler, ItemElement, TextElement, TokioFrames};
use folio_types::DiscoveryEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Input delivered by the host's delegated listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// Click resolved to the nearest filter control (`None` if outside any control)
    Click { tag_id: Option<String> },
    /// Key press while a filter control has focus
    KeyDown { tag_id: Option<String>, key: String },
    ClearClick,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub handled: bool,
    /// Host must suppress the native default action (e.g. scroll on Space)
    pub prevent_default: bool,
}

impl EventResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled(prevent_default: bool) -> Self {
        Self {
            handled: true,
            prevent_default,
        }
    }
}

fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}

struct Item {
    element: Arc<dyn ItemElement>,
    tags: TagSet,
}

struct FilterState {
    active: TagSet,
    visible: Vec<bool>,
}

impl FilterState {
    fn recompute(&mut self, items: &[Item]) {
        self.visible = items.iter().map(|item| is_visible(&item.tags, &self.active)).collect();
    }

    fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

struct SessionInner {
    section: SectionType,
    page: Arc<dyn FilterPage>,
    controls: Vec<Arc<dyn FilterControl>>,
    count_display: Arc<dyn TextElement>,
    items: Vec<Item>,
    state: Mutex<FilterState>,
    frames: Arc<dyn FrameScheduler>,
    /// Bumped per scheduled frame; a frame only paints if it is still the latest
    frame_generation: AtomicU64,
    url_debouncer: Debouncer,
    analytics: Analytics,
    cancel: CancellationToken,
}

impl SessionInner {
    fn lock_state(&self) -> MutexGuard<'_, FilterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn count_message(&self) -> String {
        let state = self.lock_state();
        results_count_message(
            state.visible_count(),
            self.items.len(),
            !state.active.is_empty(),
            self.section.label(),
        )
    }

    /// Apply model state to the page
    fn paint(&self) {
        let (active, visible) = {
            let state = self.lock_state();
            (state.active.clone(), state.visible.clone())
        };

        for control in &self.controls {
            if let Some(tag) = control.tag_id() {
                control.set_active(active.contains(&tag));
            }
        }
        for (item, visible) in self.items.iter().zip(visible) {
            item.element.set_visible(visible);
        }
        self.count_display.set_text(&self.count_message());
    }

    fn schedule_paint(self: &Arc<Self>) {
        let generation = self.frame_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let session = Arc::downgrade(self);
        self.frames.request_frame(Box::new(move || {
            if let Some(inner) = session.upgrade() {
                inner.paint_frame(generation);
            }
        }));
    }

    fn paint_frame(&self, generation: u64) {
        if self.cancel.is_cancelled() {
            return;
        }
        if self.frame_generation.load(Ordering::SeqCst) != generation {
            trace!(section = %self.section, generation, "Frame superseded");
            return;
        }
        self.paint();
    }

    fn schedule_url_write(self: &Arc<Self>) {
        let session: Weak<Self> = Arc::downgrade(self);
        self.url_debouncer.schedule(move || {
            if let Some(inner) = session.upgrade() {
                inner.write_url();
            }
        });
    }

    /// Replace the location with the latest tag state
    fn write_url(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        let tags = self.lock_state().active.clone();
        let current = self.page.location();

        match url_with_tags(&current, &tags) {
            Ok(next) if next != current => {
                debug!(section = %self.section, url = %next, "Filter URL updated");
                self.page.replace_location(&next);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(section = %self.section, location = %current, error = %e, "Could not update filter URL");
            }
        }
    }
}

/// Builder wiring a session to its page before the first paint
pub struct FilterSessionBuilder {
    section: SectionType,
    page: Arc<dyn FilterPage>,
    url_debounce: Duration,
    frames: Arc<dyn FrameScheduler>,
    analytics: Analytics,
}

impl FilterSessionBuilder {
    pub fn config(mut self, config: &FilterConfig) -> Self {
        self.url_debounce = config.url_debounce();
        self
    }

    pub fn url_debounce(mut self, delay: Duration) -> Self {
        self.url_debounce = delay;
        self
    }

    pub fn frames(mut self, frames: Arc<dyn FrameScheduler>) -> Self {
        self.frames = frames;
        self
    }

    pub fn analytics(mut self, analytics: Analytics) -> Self {
        self.analytics = analytics;
        self
    }

    /// Bind to the page anchors, bootstrap from the URL and paint.
    ///
    /// Fails if the control container, clear control or count display is
    /// missing, or if called outside a Tokio runtime. An empty item
    /// collection is valid.
    pub fn start(self) -> Result<FilterSession> {
        let Self {
            section,
            page,
            url_debounce,
            frames,
            analytics,
        } = self;

        // URL writes are debounced on spawned timers
        if let Err(e) = tokio::runtime::Handle::try_current() {
            return Err(DiscoveryError::NoRuntime(format!("{} filter session: {}", section, e)));
        }

        let controls = page
            .filter_controls()
            .ok_or_else(|| DiscoveryError::MissingAnchor("filter control container".to_string()))?;
        if !page.has_clear_control() {
            return Err(DiscoveryError::MissingAnchor("clear-all control".to_string()));
        }
        let count_display = page
            .results_count()
            .ok_or_else(|| DiscoveryError::MissingAnchor("results count display".to_string()))?;

        let items: Vec<Item> = page
            .items(&section)
            .into_iter()
            .map(|element| {
                let tags = element
                    .attribute(section.tag_attribute())
                    .map(|raw| parse_tag_list(&raw))
                    .unwrap_or_default();
                Item { element, tags }
            })
            .collect();
        if items.is_empty() {
            info!(section = %section, "No items to filter in section");
        }

        let active = tags_from_url(&page.location());
        debug!(
            section = %section,
            active = ?active,
            items = items.len(),
            controls = controls.len(),
            "Filter session bootstrapped"
        );

        let mut state = FilterState {
            active,
            visible: Vec::new(),
        };
        state.recompute(&items);

        let inner = Arc::new(SessionInner {
            section,
            page,
            controls,
            count_display,
            items,
            state: Mutex::new(state),
            frames,
            frame_generation: AtomicU64::new(0),
            url_debouncer: Debouncer::new(url_debounce),
            analytics,
            cancel: CancellationToken::new(),
        });
        inner.paint();

        Ok(FilterSession { inner })
    }
}

/// Live filter state for one content section.
///
/// Mutations recompute visibility in the model immediately; page writes are
/// batched to the next frame and the URL follows after a quiet period.
/// Dropping the session destroys it.
pub struct FilterSession {
    inner: Arc<SessionInner>,
}

impl FilterSession {
    /// Configure a session for `section`. `start` must run inside a Tokio
    /// runtime, which the session keeps using for its timers.
    pub fn builder(section: SectionType, page: Arc<dyn FilterPage>) -> FilterSessionBuilder {
        FilterSessionBuilder {
            section,
            page,
            url_debounce: FilterConfig::default().url_debounce(),
            frames: Arc::new(TokioFrames),
            analytics: Analytics::default(),
        }
    }

    /// Flip membership of `tag` in the active set
    pub fn toggle(&self, tag: &str) {
        let inner = &self.inner;
        if inner.cancel.is_cancelled() {
            trace!(section = %inner.section, tag, "Toggle on destroyed session ignored");
            return;
        }
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }

        let active = {
            let mut state = inner.lock_state();
            let active = if state.active.remove(tag) {
                false
            } else {
                state.active.insert(tag.to_string());
                true
            };
            state.recompute(&inner.items);
            active
        };
        debug!(section = %inner.section, tag, active, "Tag toggled");

        inner.analytics.track(DiscoveryEvent::TagToggled {
            section: inner.section.to_string(),
            tag: tag.to_string(),
            active,
        });
        inner.schedule_paint();
        inner.schedule_url_write();
    }

    /// Drop every active tag and write the URL without waiting
    pub fn clear_all(&self) {
        let inner = &self.inner;
        if inner.cancel.is_cancelled() {
            return;
        }

        {
            let mut state = inner.lock_state();
            state.active.clear();
            state.recompute(&inner.items);
        }
        debug!(section = %inner.section, "Filters cleared");

        inner.analytics.track(DiscoveryEvent::FiltersCleared {
            section: inner.section.to_string(),
        });
        inner.schedule_paint();
        inner.url_debouncer.cancel();
        inner.write_url();
    }

    /// Route a host event; Enter and Space activate like a click
    pub fn handle(&self, event: ControlEvent) -> EventResponse {
        if self.is_destroyed() {
            return EventResponse::ignored();
        }
        match event {
            ControlEvent::Click { tag_id: Some(tag) } => {
                self.toggle(&tag);
                EventResponse::handled(false)
            }
            ControlEvent::KeyDown {
                tag_id: Some(tag),
                key,
            } if is_activation_key(&key) => {
                self.toggle(&tag);
                EventResponse::handled(true)
            }
            ControlEvent::ClearClick => {
                self.clear_all();
                EventResponse::handled(false)
            }
            ControlEvent::Click { tag_id: None } | ControlEvent::KeyDown { .. } => {
                EventResponse::ignored()
            }
        }
    }

    /// Write a pending debounced URL update now. Returns whether one was pending.
    pub fn flush_url(&self) -> bool {
        let flushed = self.inner.url_debouncer.cancel();
        if flushed {
            self.inner.write_url();
        }
        flushed
    }

    /// Tear down: cancel listeners, pending frames and the pending URL write.
    /// Idempotent; every later mutation is a no-op.
    pub fn destroy(&self) {
        let inner = &self.inner;
        if inner.cancel.is_cancelled() {
            return;
        }
        inner.cancel.cancel();
        inner.url_debouncer.cancel();
        inner.frame_generation.fetch_add(1, Ordering::SeqCst);
        debug!(section = %inner.section, "Filter session destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Token for host listener registrations; cancelled on destroy
    pub fn listener_token(&self) -> CancellationToken {
        self.inner.cancel.child_token()
    }

    pub fn section(&self) -> &SectionType {
        &self.inner.section
    }

    /// Active tags in canonical (sorted) order
    pub fn active_tags(&self) -> Vec<String> {
        self.inner.lock_state().active.iter().cloned().collect()
    }

    pub fn is_active(&self, tag: &str) -> bool {
        self.inner.lock_state().active.contains(tag)
    }

    /// Value the `tags` parameter carries for the current state
    pub fn serialized_tags(&self) -> Option<String> {
        serialize_tags(&self.inner.lock_state().active)
    }

    pub fn visible_count(&self) -> usize {
        self.inner.lock_state().visible_count()
    }

    pub fn total_count(&self) -> usize {
        self.inner.items.len()
    }

    pub fn is_item_visible(&self, index: usize) -> Option<bool> {
        self.inner.lock_state().visible.get(index).copied()
    }

    pub fn count_message(&self) -> String {
        self.inner.count_message()
    }
}

impl Drop for FilterSession {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ImmediateFrames, ManualFrames, MemoryItem, MemoryPage};

    const WRITING: &str = "https://example.com/writing/";

    fn page(location: &str) -> Arc<MemoryPage> {
        let section = SectionType::Writing;
        Arc::new(
            MemoryPage::new(location)
                .with_controls(["design", "python", "ai"])
                .with_items([
                    MemoryItem::tagged("a", &section, "design"),
                    MemoryItem::tagged("b", &section, "python"),
                    MemoryItem::tagged("c", &section, "ai"),
                ]),
        )
    }

    fn start(page: &Arc<MemoryPage>) -> FilterSession {
        FilterSession::builder(SectionType::Writing, page.clone())
            .frames(Arc::new(ImmediateFrames))
            .analytics(Analytics::noop())
            .start()
            .unwrap()
    }

    // ============================================================================
    // Bootstrapping
    // ============================================================================

    #[tokio::test]
    async fn test_initial_paint_unfiltered() {
        let page = page(WRITING);
        let session = start(&page);

        assert_eq!(session.visible_count(), 3);
        assert_eq!(session.total_count(), 3);
        assert_eq!(page.count_text(), "3 posts total");
        assert!(page.item("c").unwrap().is_visible());
    }

    #[tokio::test]
    async fn test_bootstrap_from_url() {
        let page = page("https://example.com/writing/?tags=design,%20python,");
        let session = start(&page);

        assert_eq!(session.active_tags(), vec!["design", "python"]);
        assert_eq!(page.count_text(), "2 of 3 posts");
        assert!(page.control("design").unwrap().is_pressed());
        assert!(!page.control("ai").unwrap().is_pressed());
        assert!(!page.item("c").unwrap().is_visible());
        // Bootstrapping never rewrites the URL
        assert!(page.replaced_urls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_container_fails() {
        let page = Arc::new(MemoryPage::new(WRITING).without_container());
        let err = FilterSession::builder(SectionType::Writing, page).start().err().unwrap();
        assert!(matches!(err, DiscoveryError::MissingAnchor(ref a) if a.contains("container")));
    }

    #[tokio::test]
    async fn test_missing_clear_control_fails() {
        let page = Arc::new(MemoryPage::new(WRITING).without_clear_control());
        let err = FilterSession::builder(SectionType::Writing, page).start().err().unwrap();
        assert!(matches!(err, DiscoveryError::MissingAnchor(ref a) if a.contains("clear")));
    }

    #[tokio::test]
    async fn test_missing_count_display_fails() {
        let page = Arc::new(MemoryPage::new(WRITING).without_results_count());
        let err = FilterSession::builder(SectionType::Writing, page).start().err().unwrap();
        assert!(matches!(err, DiscoveryError::MissingAnchor(ref a) if a.contains("count")));
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let page = page(WRITING);
        let err = FilterSession::builder(SectionType::Writing, page.clone())
            .frames(Arc::new(ImmediateFrames))
            .start()
            .err()
            .unwrap();
        assert!(matches!(err, DiscoveryError::NoRuntime(ref what) if what.contains("writing")));
        assert_eq!(page.count_text(), "");
    }

    #[tokio::test]
    async fn test_empty_section_is_valid() {
        let page = Arc::new(MemoryPage::new(WRITING).with_controls(["design"]));
        let session = start(&page);
        assert_eq!(session.total_count(), 0);
        assert_eq!(page.count_text(), "0 posts total");

        session.toggle("design");
        assert_eq!(session.count_message(), "0 of 0 posts");
    }

    // ============================================================================
    // Toggling and events
    // ============================================================================

    #[tokio::test]
    async fn test_toggle_twice_restores() {
        let page = page(WRITING);
        let session = start(&page);

        session.toggle("ai");
        assert!(session.is_active("ai"));
        assert_eq!(session.visible_count(), 1);

        session.toggle("ai");
        assert!(!session.is_active("ai"));
        assert_eq!(session.visible_count(), 3);
    }

    #[tokio::test]
    async fn test_blank_tag_ignored() {
        let page = page(WRITING);
        let session = start(&page);
        session.toggle("  ");
        assert!(session.active_tags().is_empty());
    }

    #[tokio::test]
    async fn test_space_prevents_default() {
        let page = page(WRITING);
        let session = start(&page);

        let response = session.handle(ControlEvent::KeyDown {
            tag_id: Some("python".to_string()),
            key: " ".to_string(),
        });
        assert_eq!(
            response,
            EventResponse {
                handled: true,
                prevent_default: true
            }
        );
        assert!(session.is_active("python"));
    }

    #[tokio::test]
    async fn test_other_keys_ignored() {
        let page = page(WRITING);
        let session = start(&page);

        let response = session.handle(ControlEvent::KeyDown {
            tag_id: Some("python".to_string()),
            key: "Tab".to_string(),
        });
        assert!(!response.handled);
        assert!(!response.prevent_default);
        assert!(session.active_tags().is_empty());
    }

    #[tokio::test]
    async fn test_click_outside_control_ignored() {
        let page = page(WRITING);
        let session = start(&page);
        assert!(!session.handle(ControlEvent::Click { tag_id: None }).handled);
    }

    // ============================================================================
    // Frame batching
    // ============================================================================

    #[tokio::test]
    async fn test_paint_waits_for_frame() {
        let page = page(WRITING);
        let frames = Arc::new(ManualFrames::new());
        let session = FilterSession::builder(SectionType::Writing, page.clone())
            .frames(frames.clone())
            .analytics(Analytics::noop())
            .start()
            .unwrap();

        session.toggle("design");
        // Model is updated synchronously, the page is not
        assert_eq!(session.visible_count(), 1);
        assert!(page.item("b").unwrap().is_visible());
        assert_eq!(page.count_text(), "3 posts total");

        frames.flush();
        assert!(!page.item("b").unwrap().is_visible());
        assert_eq!(page.count_text(), "1 of 3 posts");
    }

    #[tokio::test]
    async fn test_superseded_frame_skipped() {
        let page = page(WRITING);
        let frames = Arc::new(ManualFrames::new());
        let session = FilterSession::builder(SectionType::Writing, page.clone())
            .frames(frames.clone())
            .analytics(Analytics::noop())
            .start()
            .unwrap();
        let writes_before = page.item("a").unwrap().visibility_writes();

        session.toggle("design");
        session.toggle("python");
        assert_eq!(frames.flush(), 2);

        // Only the latest frame painted
        assert_eq!(page.item("a").unwrap().visibility_writes(), writes_before + 1);
        assert_eq!(page.count_text(), "2 of 3 posts");
    }

    #[tokio::test]
    async fn test_destroy_cancels_pending_frame() {
        let page = page(WRITING);
        let frames = Arc::new(ManualFrames::new());
        let session = FilterSession::builder(SectionType::Writing, page.clone())
            .frames(frames.clone())
            .analytics(Analytics::noop())
            .start()
            .unwrap();

        session.toggle("design");
        session.destroy();
        frames.flush();
        assert_eq!(page.count_text(), "3 posts total");
    }

    // ============================================================================
    // URL sync
    // ============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_url_write_debounced() {
        let page = page(WRITING);
        let session = start(&page);

        session.toggle("python");
        session.toggle("design");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(page.replaced_urls().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let urls = page.replaced_urls();
        assert_eq!(urls.len(), 1);
        assert_eq!(tags_from_url(&urls[0]), parse_tag_list("design,python"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_writes_immediately() {
        let page = page("https://example.com/writing/?tags=ai");
        let session = start(&page);

        session.clear_all();
        assert_eq!(page.location(), "https://example.com/writing/");
        assert_eq!(page.count_text(), "3 posts total");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_supersedes_pending_toggle_write() {
        let page = page(WRITING);
        let session = start(&page);

        session.toggle("ai");
        session.clear_all();
        tokio::time::sleep(Duration::from_secs(1)).await;

        // Location unchanged, so nothing was written at all
        assert!(page.replaced_urls().is_empty());
        assert_eq!(page.location(), WRITING);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_url() {
        let page = page(WRITING);
        let session = start(&page);

        assert!(!session.flush_url());
        session.toggle("ai");
        assert!(session.flush_url());
        assert_eq!(page.location(), "https://example.com/writing/?tags=ai");
    }

    // ============================================================================
    // Teardown
    // ============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_toggle_after_destroy_is_noop() {
        let page = page(WRITING);
        let session = start(&page);
        let token = session.listener_token();

        session.toggle("ai");
        session.destroy();
        session.destroy();
        session.toggle("design");
        session.clear_all();

        assert!(token.is_cancelled());
        assert!(session.is_destroyed());
        assert_eq!(session.active_tags(), vec!["ai"]);
        assert!(!session.handle(ControlEvent::ClearClick).handled);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(page.replaced_urls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_url_write() {
        let page = page(WRITING);
        {
            let session = start(&page);
            session.toggle("ai");
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(page.replaced_urls().is_empty());
    }
}
