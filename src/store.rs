use crate::error::AppError;
use crate::models::{AppProject, Author, BlogPost, Photo, Record};
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
pub trait Store: Send + Sync {
    async fn list_apps(&self) -> Result<Vec<AppProject>, AppError>;
    async fn save_app(&self, app: AppProject) -> Result<AppProject, AppError>;
    async fn delete_app(&self, id: &str) -> Result<bool, AppError>;

    async fn list_posts(&self) -> Result<Vec<BlogPost>, AppError>;
    async fn get_post(&self, id: &str) -> Result<Option<BlogPost>, AppError>;
    async fn save_post(&self, post: BlogPost) -> Result<BlogPost, AppError>;
    async fn delete_post(&self, id: &str) -> Result<bool, AppError>;

    async fn list_photos(&self) -> Result<Vec<Photo>, AppError>;
    async fn get_photo(&self, id: &str) -> Result<Option<Photo>, AppError>;
    async fn save_photo(&self, photo: Photo) -> Result<Photo, AppError>;
    async fn delete_photo(&self, id: &str) -> Result<bool, AppError>;
    /// Appends photos whose ids are not already stored; returns how many were added.
    async fn append_photos(&self, batch: Vec<Photo>) -> Result<usize, AppError>;

    async fn list_authors(&self) -> Result<Vec<Author>, AppError>;
}

/// Timestamp-based id, bumped until it is unused in `items`.
pub fn next_id<T: Record>(items: &[T]) -> String {
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while items.iter().any(|item| item.id() == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

/// Replaces the record with a matching id in place, or appends it under a fresh id.
pub fn upsert<T: Record + Clone>(items: &mut Vec<T>, mut record: T) -> T {
    if let Some(existing) = items.iter_mut().find(|item| item.id() == record.id()) {
        *existing = record.clone();
        log::debug!("Replaced record {}", record.id());
        return record;
    }
    let id = next_id(items);
    log::debug!("Inserting new record with id {}", id);
    record.set_id(id);
    items.push(record.clone());
    record
}

pub fn remove<T: Record>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

pub fn append_new<T: Record>(items: &mut Vec<T>, batch: Vec<T>) -> usize {
    let mut seen: HashSet<String> = items.iter().map(|item| item.id().to_string()).collect();
    let mut added = 0;
    for record in batch {
        if seen.insert(record.id().to_string()) {
            items.push(record);
            added += 1;
        } else {
            log::trace!("Skipping already stored record {}", record.id());
        }
    }
    added
}
