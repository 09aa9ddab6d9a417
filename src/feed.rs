use crate::config::{AppConfig, FeedKind};
use crate::error::AppError;
use crate::models::{Location, Photo, DATE_FORMAT};
use crate::store::Store;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::sync::Arc;

/// Source of additional gallery photos, one page at a time.
/// An empty page means the feed is exhausted.
#[async_trait]
pub trait PhotoFeed: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>, AppError>;
}

const DEMO_SIZES: [(u32, u32); 6] = [
    (600, 400),
    (600, 800),
    (600, 600),
    (600, 900),
    (800, 600),
    (600, 750),
];

const DEMO_PLACES: [(f64, f64, &str); 6] = [
    (37.8199, -122.4783, "Golden Gate Bridge"),
    (35.6909, 139.7005, "Shinjuku"),
    (52.52, 13.405, "Berlin, Germany"),
    (46.8182, 8.2275, "Swiss Alps"),
    (64.1466, -21.9426, "Reykjavik, Iceland"),
    (-33.8688, 151.2093, "Sydney, Australia"),
];

/// Deterministic demo photos for the gallery's endless scroll.
#[derive(Debug, Clone)]
pub struct SyntheticFeed {
    page_size: usize,
    max_pages: Option<u32>,
    newest: NaiveDate,
}

impl SyntheticFeed {
    pub fn new(page_size: usize, max_pages: Option<u32>) -> Self {
        Self {
            page_size: page_size.max(1),
            max_pages,
            newest: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default(),
        }
    }

    pub fn generate(&self, page: u32) -> Vec<Photo> {
        if self.max_pages.map_or(false, |max| page >= max) {
            log::debug!("Synthetic feed exhausted at page {}", page);
            return Vec::new();
        }
        let start = match (page as usize).checked_mul(self.page_size) {
            Some(start) => start,
            None => return Vec::new(),
        };
        // A page that runs past the calendar is cut short; an empty one reads as exhausted.
        (start..start.saturating_add(self.page_size))
            .map_while(|n| self.photo(n))
            .collect()
    }

    fn photo(&self, n: usize) -> Option<Photo> {
        let (width, height) = DEMO_SIZES[n % DEMO_SIZES.len()];
        let (lat, lng, name) = DEMO_PLACES[n % DEMO_PLACES.len()];
        let days = (n as u64).checked_mul(3)?;
        let date = match self.newest.checked_sub_days(Days::new(days)) {
            Some(date) => date,
            None => {
                log::debug!("Demo photo #{} falls before the earliest date, stopping", n + 1);
                return None;
            }
        };
        Some(Photo {
            id: format!("demo-{}", n + 1),
            url: format!("https://picsum.photos/{}/{}?random=demo{}", width, height, n + 1),
            caption: format!("Field note #{} from {}", n + 1, name),
            location: Location { lat, lng, name: name.to_string() },
            date: date.format(DATE_FORMAT).to_string(),
            author_id: None,
        })
    }
}

#[async_trait]
impl PhotoFeed for SyntheticFeed {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>, AppError> {
        Ok(self.generate(page))
    }
}

/// Pages over the stored photo list.
pub struct StoreFeed {
    store: Arc<dyn Store>,
    page_size: usize,
}

impl StoreFeed {
    pub fn new(store: Arc<dyn Store>, page_size: usize) -> Self {
        Self { store, page_size: page_size.max(1) }
    }
}

#[async_trait]
impl PhotoFeed for StoreFeed {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>, AppError> {
        let photos = self
            .store
            .list_photos()
            .await
            .map_err(|e| AppError::FeedUnavailable(e.to_string()))?;
        let page: Vec<Photo> = photos
            .into_iter()
            .skip((page as usize).saturating_mul(self.page_size))
            .take(self.page_size)
            .collect();
        log::debug!("Store feed returned {} photos", page.len());
        Ok(page)
    }
}

pub fn build_feed(config: &AppConfig, store: Arc<dyn Store>) -> Arc<dyn PhotoFeed> {
    log::info!("Using {:?} photo feed, {} per page", config.feed, config.feed_page_size);
    match config.feed {
        FeedKind::Synthetic => Arc::new(SyntheticFeed::new(config.feed_page_size, config.feed_max_pages)),
        FeedKind::Store => Arc::new(StoreFeed::new(store, config.feed_page_size)),
    }
}
