use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{AppProject, Author, BlogPost, Photo};
use crate::seed;
use crate::store::{self, Store};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const APPS_FILE: &str = "apps.json";
const POSTS_FILE: &str = "posts.json";
const PHOTOS_FILE: &str = "photos.json";
const AUTHORS_FILE: &str = "authors.json";

/// One JSON array per collection; a missing file is seeded on first read.
/// Writes replace the whole file atomically.
pub struct JsonFileStore {
    data_directory: PathBuf,
    // Serializes read-modify-write cycles across handlers.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Self::open(&config.data_directory)
    }

    pub fn open(data_directory: impl AsRef<Path>) -> Result<Self, AppError> {
        let data_directory = data_directory.as_ref().to_path_buf();
        log::debug!("Initializing JSON store in {:?}", data_directory);
        if !data_directory.exists() {
            std::fs::create_dir_all(&data_directory)?;
            log::info!("Created data directory: {:?}", data_directory);
        }
        Ok(Self { data_directory, write_lock: Mutex::new(()) })
    }

    async fn read<T, F>(&self, file: &str, seed: F) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Vec<T>,
    {
        let path = self.data_directory.join(file);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Self::parse(&path, &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let _guard = self.write_lock.lock().await;
                self.read_locked(file, seed).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Caller holds `write_lock`, so seeding a missing file happens once.
    async fn read_locked<T, F>(&self, file: &str, seed: F) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Vec<T>,
    {
        let path = self.data_directory.join(file);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Self::parse(&path, &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{:?} not found. Seeding default data.", path);
                let data = seed();
                self.write(file, &data).await?;
                Ok(data)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn parse<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<Vec<T>, AppError> {
        log::trace!("Read {} bytes from {:?}", bytes.len(), path);
        serde_json::from_slice(bytes).map_err(|e| {
            log::error!("Failed to parse {:?}: {}", path, e);
            AppError::Storage(format!("{:?}: {}", path, e))
        })
    }

    // Written beside the target and renamed over it, so readers never see a partial file.
    async fn write<T: Serialize>(&self, file: &str, data: &[T]) -> Result<(), AppError> {
        let path = self.data_directory.join(file);
        let staging = self.data_directory.join(format!(".{}.tmp", file));
        let bytes = serde_json::to_vec_pretty(data)?;
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &path).await?;
        log::trace!("Wrote {} records to {:?}", data.len(), path);
        Ok(())
    }

    async fn modify<T, F, R, M>(&self, file: &str, seed: F, mutate: M) -> Result<R, AppError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Vec<T>,
        M: FnOnce(&mut Vec<T>) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_locked(file, seed).await?;
        let result = mutate(&mut items);
        self.write(file, &items).await?;
        Ok(result)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn list_apps(&self) -> Result<Vec<AppProject>, AppError> {
        self.read(APPS_FILE, seed::apps).await
    }

    async fn save_app(&self, app: AppProject) -> Result<AppProject, AppError> {
        self.modify(APPS_FILE, seed::apps, |apps| store::upsert(apps, app)).await
    }

    async fn delete_app(&self, id: &str) -> Result<bool, AppError> {
        self.modify(APPS_FILE, seed::apps, |apps| store::remove(apps, id)).await
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        self.read(POSTS_FILE, seed::posts).await
    }

    async fn get_post(&self, id: &str) -> Result<Option<BlogPost>, AppError> {
        Ok(self.list_posts().await?.into_iter().find(|p| p.id == id))
    }

    async fn save_post(&self, post: BlogPost) -> Result<BlogPost, AppError> {
        self.modify(POSTS_FILE, seed::posts, |posts| store::upsert(posts, post)).await
    }

    async fn delete_post(&self, id: &str) -> Result<bool, AppError> {
        self.modify(POSTS_FILE, seed::posts, |posts| store::remove(posts, id)).await
    }

    async fn list_photos(&self) -> Result<Vec<Photo>, AppError> {
        self.read(PHOTOS_FILE, seed::photos).await
    }

    async fn get_photo(&self, id: &str) -> Result<Option<Photo>, AppError> {
        Ok(self.list_photos().await?.into_iter().find(|p| p.id == id))
    }

    async fn save_photo(&self, photo: Photo) -> Result<Photo, AppError> {
        self.modify(PHOTOS_FILE, seed::photos, |photos| store::upsert(photos, photo)).await
    }

    async fn delete_photo(&self, id: &str) -> Result<bool, AppError> {
        self.modify(PHOTOS_FILE, seed::photos, |photos| store::remove(photos, id)).await
    }

    async fn append_photos(&self, batch: Vec<Photo>) -> Result<usize, AppError> {
        self.modify(PHOTOS_FILE, seed::photos, |photos| store::append_new(photos, batch)).await
    }

    async fn list_authors(&self) -> Result<Vec<Author>, AppError> {
        self.read(AUTHORS_FILE, seed::authors).await
    }
}
