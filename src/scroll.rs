//! Gallery page state: the photo list, its masonry layout, the endless-scroll
//! loader and the lightbox.

use crate::error::AppError;
use crate::feed::PhotoFeed;
use crate::layout::{columns_for_width, ColumnBalancer, ColumnSnapshot};
use crate::lightbox::{ClickTarget, Lightbox, LightboxView};
use crate::models::Photo;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { page: u32 },
    Loaded { added: usize },
    /// The last fetch failed; the next intersection retries the same page.
    Failed { message: String, retryable: bool },
    /// The feed returned an empty page; no further loads are started.
    Exhausted,
}

/// Guarded "load more" state machine: at most one load in flight.
#[derive(Debug, Clone)]
pub struct InfiniteScroll {
    state: LoadState,
    next_page: u32,
    prefetch_margin: f64,
}

impl InfiniteScroll {
    pub fn new(prefetch_margin_px: u32) -> Self {
        Self { state: LoadState::Idle, next_page: 0, prefetch_margin: prefetch_margin_px as f64 }
    }

    /// Continues from `next_page` when earlier pages were already shown.
    pub fn starting_at(prefetch_margin_px: u32, next_page: u32) -> Self {
        Self { next_page, ..Self::new(prefetch_margin_px) }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == LoadState::Exhausted
    }

    /// Whether a sentinel whose top edge sits at `sentinel_top` intersects a
    /// viewport ending at `viewport_bottom`, extended by the prefetch margin.
    pub fn sentinel_visible(&self, sentinel_top: f64, viewport_bottom: f64) -> bool {
        sentinel_top <= viewport_bottom + self.prefetch_margin
    }

    /// Starts a load if none is running and the feed is not exhausted.
    /// Returns the page to fetch.
    pub fn begin(&mut self) -> Option<u32> {
        match self.state {
            LoadState::Loading { .. } => {
                log::trace!("Load already in flight, ignoring intersection");
                None
            }
            LoadState::Exhausted => None,
            _ => {
                self.state = LoadState::Loading { page: self.next_page };
                Some(self.next_page)
            }
        }
    }

    /// Abandons a load started by `begin` whose result will never arrive.
    pub fn cancel(&mut self) {
        if let LoadState::Loading { page } = self.state {
            log::debug!("Load of page {} abandoned", page);
            self.state = LoadState::Idle;
        }
    }

    /// Records the outcome of the load started by `begin` and hands back the photos to merge.
    pub fn finish(&mut self, result: Result<Vec<Photo>, AppError>) -> Vec<Photo> {
        match result {
            Ok(photos) if photos.is_empty() => {
                log::info!("Photo feed exhausted after {} pages", self.next_page);
                self.state = LoadState::Exhausted;
                Vec::new()
            }
            Ok(photos) => {
                self.next_page += 1;
                self.state = LoadState::Loaded { added: photos.len() };
                photos
            }
            Err(e) => {
                log::warn!("Loading page {} failed: {}", self.next_page, e);
                self.state = LoadState::Failed { message: e.to_string(), retryable: e.is_retryable() };
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A load was already running or the feed is exhausted.
    Ignored,
    Appended(usize),
    Exhausted,
    Failed(String),
}

#[derive(Debug)]
struct GalleryState {
    photos: Vec<Photo>,
    ids: HashSet<String>,
    viewport_width: u32,
    balancer: ColumnBalancer,
    scroll: InfiniteScroll,
    lightbox: Lightbox,
}

impl GalleryState {
    fn merge(&mut self, incoming: Vec<Photo>) -> usize {
        let mut added = 0;
        for photo in incoming {
            if self.ids.insert(photo.id.clone()) {
                self.photos.push(photo);
                added += 1;
            }
        }
        let columns = columns_for_width(self.viewport_width);
        self.balancer.sync(columns, &self.photos);
        added
    }
}

/// Clears the in-flight flag if a load is dropped before it finishes.
struct InFlight<'a> {
    gallery: &'a Gallery,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.gallery.lock().scroll.cancel();
        }
    }
}

/// Shared gallery view. Methods take `&self` so the loader can be driven from
/// concurrent intersection events.
#[derive(Debug)]
pub struct Gallery {
    state: Mutex<GalleryState>,
}

impl Gallery {
    pub fn new(viewport_width: u32, fallback_ratio: f64, prefetch_margin_px: u32) -> Self {
        Self {
            state: Mutex::new(GalleryState {
                photos: Vec::new(),
                ids: HashSet::new(),
                viewport_width,
                balancer: ColumnBalancer::new(columns_for_width(viewport_width), fallback_ratio),
                scroll: InfiniteScroll::new(prefetch_margin_px),
                lightbox: Lightbox::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GalleryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds photos from the source list, ignoring ids already shown.
    pub fn extend(&self, photos: Vec<Photo>) -> usize {
        self.lock().merge(photos)
    }

    pub fn set_viewport_width(&self, width: u32) {
        let mut state = self.lock();
        state.viewport_width = width;
        let columns = columns_for_width(width);
        let state = &mut *state;
        state.balancer.sync(columns, &state.photos);
    }

    /// Handles the sentinel coming into view: fetches the next page unless a
    /// load is already running, then merges the result into the layout.
    pub async fn on_sentinel_visible(&self, feed: &dyn PhotoFeed) -> LoadOutcome {
        let begun = self.lock().scroll.begin();
        let page = match begun {
            Some(page) => page,
            None => return LoadOutcome::Ignored,
        };
        log::debug!("Loading gallery page {}", page);

        let mut in_flight = InFlight { gallery: self, armed: true };
        let result = feed.fetch_page(page).await;
        in_flight.armed = false;

        let mut state = self.lock();
        let failure = result.as_ref().err().map(|e| e.to_string());
        let photos = state.scroll.finish(result);
        if let Some(message) = failure {
            return LoadOutcome::Failed(message);
        }
        if state.scroll.is_exhausted() {
            return LoadOutcome::Exhausted;
        }
        LoadOutcome::Appended(state.merge(photos))
    }

    /// Runs `on_sentinel_visible` only if the sentinel is within the prefetch margin.
    pub async fn on_scroll(
        &self,
        feed: &dyn PhotoFeed,
        sentinel_top: f64,
        viewport_bottom: f64,
    ) -> LoadOutcome {
        if !self.lock().scroll.sentinel_visible(sentinel_top, viewport_bottom) {
            return LoadOutcome::Ignored;
        }
        self.on_sentinel_visible(feed).await
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().scroll.state().clone()
    }

    pub fn photos(&self) -> Vec<Photo> {
        self.lock().photos.clone()
    }

    pub fn columns(&self) -> Vec<ColumnSnapshot> {
        self.lock().balancer.snapshot()
    }

    pub fn column_ids(&self) -> Vec<Vec<String>> {
        self.lock()
            .balancer
            .column_ids()
            .into_iter()
            .map(|column| column.into_iter().map(str::to_string).collect())
            .collect()
    }

    pub fn select(&self, id: &str) {
        self.lock().lightbox.select(id);
    }

    pub fn close_lightbox(&self) {
        self.lock().lightbox.close();
    }

    pub fn click_lightbox(&self, target: ClickTarget) {
        self.lock().lightbox.click(target);
    }

    pub fn lightbox(&self) -> Option<LightboxView> {
        let state = self.lock();
        state.lightbox.view(&state.photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::SyntheticFeed;
    use crate::seed;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFeed {
        calls: AtomicUsize,
        inner: SyntheticFeed,
    }

    #[async_trait]
    impl PhotoFeed for CountingFeed {
        async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.fetch_page(page).await
        }
    }

    struct StalledFeed;

    #[async_trait]
    impl PhotoFeed for StalledFeed {
        async fn fetch_page(&self, _page: u32) -> Result<Vec<Photo>, AppError> {
            futures::future::pending().await
        }
    }

    struct FlakyFeed {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PhotoFeed for FlakyFeed {
        async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>, AppError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(AppError::FeedUnavailable("connection reset".into()));
            }
            Ok(SyntheticFeed::new(2, None).generate(page))
        }
    }

    #[test]
    fn begin_is_guarded_while_loading() {
        let mut scroll = InfiniteScroll::new(600);
        assert_eq!(scroll.begin(), Some(0));
        assert_eq!(scroll.begin(), None);
        assert!(scroll.is_in_flight());

        let photos = scroll.finish(Ok(SyntheticFeed::new(2, None).generate(0)));
        assert_eq!(photos.len(), 2);
        assert_eq!(scroll.state(), &LoadState::Loaded { added: 2 });
        assert_eq!(scroll.begin(), Some(1));
    }

    #[test]
    fn empty_page_marks_exhausted() {
        let mut scroll = InfiniteScroll::starting_at(0, 3);
        assert_eq!(scroll.begin(), Some(3));
        scroll.finish(Ok(Vec::new()));
        assert!(scroll.is_exhausted());
        assert_eq!(scroll.begin(), None);
    }

    #[test]
    fn failure_clears_flight_and_retries_same_page() {
        let mut scroll = InfiniteScroll::new(0);
        assert_eq!(scroll.begin(), Some(0));
        let photos = scroll.finish(Err(AppError::FeedUnavailable("offline".into())));
        assert!(photos.is_empty());
        assert!(!scroll.is_in_flight());
        assert!(matches!(scroll.state(), LoadState::Failed { retryable: true, .. }));
        assert_eq!(scroll.begin(), Some(0));
    }

    #[test]
    fn sentinel_visibility_uses_prefetch_margin() {
        let scroll = InfiniteScroll::new(600);
        assert!(scroll.sentinel_visible(1500.0, 1000.0));
        assert!(scroll.sentinel_visible(1600.0, 1000.0));
        assert!(!scroll.sentinel_visible(1601.0, 1000.0));
    }

    #[tokio::test]
    async fn concurrent_intersections_fetch_once() {
        let gallery = Gallery::new(1200, 1.25, 600);
        let feed = CountingFeed { calls: AtomicUsize::new(0), inner: SyntheticFeed::new(3, None) };

        let (a, b) = tokio::join!(gallery.on_sentinel_visible(&feed), gallery.on_sentinel_visible(&feed));

        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, LoadOutcome::Appended(3));
        assert_eq!(b, LoadOutcome::Ignored);
        assert_eq!(gallery.photos().len(), 3);
    }

    #[tokio::test]
    async fn loads_until_exhausted() {
        let gallery = Gallery::new(800, 1.25, 600);
        let feed = SyntheticFeed::new(2, Some(2));

        assert_eq!(gallery.on_sentinel_visible(&feed).await, LoadOutcome::Appended(2));
        assert_eq!(gallery.on_sentinel_visible(&feed).await, LoadOutcome::Appended(2));
        assert_eq!(gallery.on_sentinel_visible(&feed).await, LoadOutcome::Exhausted);
        assert_eq!(gallery.on_sentinel_visible(&feed).await, LoadOutcome::Ignored);
        assert_eq!(gallery.photos().len(), 4);
        assert_eq!(gallery.columns().len(), 2);
    }

    #[tokio::test]
    async fn failed_load_can_be_retried() {
        let gallery = Gallery::new(400, 1.25, 600);
        let feed = FlakyFeed { calls: AtomicUsize::new(0) };

        assert!(matches!(gallery.on_sentinel_visible(&feed).await, LoadOutcome::Failed(_)));
        assert!(gallery.photos().is_empty());
        assert!(matches!(gallery.load_state(), LoadState::Failed { retryable: true, .. }));
        assert_eq!(gallery.on_sentinel_visible(&feed).await, LoadOutcome::Appended(2));
        assert_eq!(gallery.load_state(), LoadState::Loaded { added: 2 });
        assert_eq!(gallery.photos()[0].id, "demo-1");
    }

    #[test]
    fn cancel_only_clears_a_running_load() {
        let mut scroll = InfiniteScroll::new(0);
        scroll.cancel();
        assert_eq!(scroll.state(), &LoadState::Idle);
        assert_eq!(scroll.begin(), Some(0));
        scroll.cancel();
        assert!(!scroll.is_in_flight());
        assert_eq!(scroll.begin(), Some(0));
        scroll.finish(Ok(Vec::new()));
        scroll.cancel();
        assert!(scroll.is_exhausted());
    }

    #[tokio::test]
    async fn dropped_load_does_not_block_later_ones() {
        use futures::FutureExt;

        let gallery = Gallery::new(1200, 1.25, 600);
        assert!(gallery.on_sentinel_visible(&StalledFeed).now_or_never().is_none());
        assert_eq!(gallery.load_state(), LoadState::Idle);

        let feed = SyntheticFeed::new(3, None);
        assert_eq!(gallery.on_sentinel_visible(&feed).await, LoadOutcome::Appended(3));
        assert_eq!(gallery.photos()[0].id, "demo-1");
    }

    #[tokio::test]
    async fn scroll_outside_margin_does_not_fetch() {
        let gallery = Gallery::new(1200, 1.25, 100);
        let feed = CountingFeed { calls: AtomicUsize::new(0), inner: SyntheticFeed::new(3, None) };
        assert_eq!(gallery.on_scroll(&feed, 2000.0, 1000.0).await, LoadOutcome::Ignored);
        assert_eq!(gallery.on_scroll(&feed, 1050.0, 1000.0).await, LoadOutcome::Appended(3));
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_source_photos_are_shown_once() {
        let gallery = Gallery::new(1200, 1.25, 600);
        assert_eq!(gallery.extend(seed::photos()), 4);
        let before = gallery.column_ids();
        assert_eq!(gallery.extend(seed::photos()), 0);
        assert_eq!(gallery.column_ids(), before);
    }

    #[test]
    fn resizing_rebuilds_columns() {
        let gallery = Gallery::new(1200, 1.25, 600);
        gallery.extend(seed::photos());
        assert_eq!(gallery.columns().len(), 3);
        gallery.set_viewport_width(500);
        let columns = gallery.column_ids();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0], vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn closing_lightbox_leaves_layout_alone() {
        let gallery = Gallery::new(1200, 1.25, 600);
        gallery.extend(seed::photos());
        let before = gallery.column_ids();

        gallery.select("3");
        assert_eq!(gallery.lightbox().map(|v| v.photo.id), Some("3".to_string()));
        gallery.close_lightbox();
        assert!(gallery.lightbox().is_none());
        assert_eq!(gallery.column_ids(), before);

        gallery.select("1");
        gallery.click_lightbox(ClickTarget::Backdrop);
        assert!(gallery.lightbox().is_none());
    }
}
