use crate::error::AppError;
use crate::models::{AppProject, Author, BlogPost, Photo};
use crate::seed;
use crate::store::{self, Store};
use async_trait::async_trait;
use tokio::sync::RwLock;

struct Collections {
    apps: Vec<AppProject>,
    posts: Vec<BlogPost>,
    photos: Vec<Photo>,
    authors: Vec<Author>,
}

pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        log::debug!("Initializing in-memory store with seed data.");
        Self::with_photos(seed::photos())
    }

    pub fn with_photos(photos: Vec<Photo>) -> Self {
        Self {
            inner: RwLock::new(Collections {
                apps: seed::apps(),
                posts: seed::posts(),
                photos,
                authors: seed::authors(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_apps(&self) -> Result<Vec<AppProject>, AppError> {
        Ok(self.inner.read().await.apps.clone())
    }

    async fn save_app(&self, app: AppProject) -> Result<AppProject, AppError> {
        Ok(store::upsert(&mut self.inner.write().await.apps, app))
    }

    async fn delete_app(&self, id: &str) -> Result<bool, AppError> {
        Ok(store::remove(&mut self.inner.write().await.apps, id))
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        Ok(self.inner.read().await.posts.clone())
    }

    async fn get_post(&self, id: &str) -> Result<Option<BlogPost>, AppError> {
        Ok(self.inner.read().await.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn save_post(&self, post: BlogPost) -> Result<BlogPost, AppError> {
        Ok(store::upsert(&mut self.inner.write().await.posts, post))
    }

    async fn delete_post(&self, id: &str) -> Result<bool, AppError> {
        Ok(store::remove(&mut self.inner.write().await.posts, id))
    }

    async fn list_photos(&self) -> Result<Vec<Photo>, AppError> {
        Ok(self.inner.read().await.photos.clone())
    }

    async fn get_photo(&self, id: &str) -> Result<Option<Photo>, AppError> {
        Ok(self.inner.read().await.photos.iter().find(|p| p.id == id).cloned())
    }

    async fn save_photo(&self, photo: Photo) -> Result<Photo, AppError> {
        Ok(store::upsert(&mut self.inner.write().await.photos, photo))
    }

    async fn delete_photo(&self, id: &str) -> Result<bool, AppError> {
        Ok(store::remove(&mut self.inner.write().await.photos, id))
    }

    async fn append_photos(&self, batch: Vec<Photo>) -> Result<usize, AppError> {
        Ok(store::append_new(&mut self.inner.write().await.photos, batch))
    }

    async fn list_authors(&self) -> Result<Vec<Author>, AppError> {
        Ok(self.inner.read().await.authors.clone())
    }
}
