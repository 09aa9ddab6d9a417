//! Save/delete flows for the admin panel as explicit state machines, with
//! cached lists that are dropped after every successful write.

use crate::error::AppError;
use crate::models::{AppProject, BlogPost, Photo};
use crate::store::Store;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct Mutation {
    state: MutationState,
}

impl Mutation {
    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == MutationState::Pending
    }

    pub fn begin(&mut self) -> Result<(), AppError> {
        if self.is_pending() {
            return Err(AppError::Generic("a save or delete is already running".into()));
        }
        self.state = MutationState::Pending;
        Ok(())
    }

    pub fn settle<T>(&mut self, result: &Result<T, AppError>) {
        self.state = match result {
            Ok(_) => MutationState::Succeeded,
            Err(e) => MutationState::Failed(e.to_string()),
        };
    }

    pub fn reset(&mut self) {
        self.state = MutationState::Idle;
    }

    pub async fn run<T, F>(&mut self, operation: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.begin()?;
        let mut guard = Settling { mutation: self };
        let result = operation.await;
        guard.mutation.settle(&result);
        result
    }
}

/// Returns a mutation to `Idle` if its operation is dropped before settling.
struct Settling<'a> {
    mutation: &'a mut Mutation,
}

impl Drop for Settling<'_> {
    fn drop(&mut self) {
        if self.mutation.is_pending() {
            log::debug!("Mutation dropped before settling");
            self.mutation.reset();
        }
    }
}

/// A list fetched from the store and kept until a write invalidates it.
#[derive(Debug)]
struct Cached<T> {
    data: Option<Vec<T>>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self { data: None }
    }
}

/// Admin-side view of the store: cached collections plus one mutation per collection.
pub struct AdminConsole {
    store: Arc<dyn Store>,
    photos: Cached<Photo>,
    posts: Cached<BlogPost>,
    apps: Cached<AppProject>,
    photo_mutation: Mutation,
    post_mutation: Mutation,
    app_mutation: Mutation,
}

impl AdminConsole {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            photos: Cached::default(),
            posts: Cached::default(),
            apps: Cached::default(),
            photo_mutation: Mutation::default(),
            post_mutation: Mutation::default(),
            app_mutation: Mutation::default(),
        }
    }

    pub async fn photos(&mut self) -> Result<&[Photo], AppError> {
        if self.photos.data.is_none() {
            log::debug!("Fetching photos for admin console");
            self.photos.data = Some(self.store.list_photos().await?);
        }
        Ok(self.photos.data.as_deref().unwrap_or_default())
    }

    pub async fn posts(&mut self) -> Result<&[BlogPost], AppError> {
        if self.posts.data.is_none() {
            log::debug!("Fetching posts for admin console");
            self.posts.data = Some(self.store.list_posts().await?);
        }
        Ok(self.posts.data.as_deref().unwrap_or_default())
    }

    pub async fn apps(&mut self) -> Result<&[AppProject], AppError> {
        if self.apps.data.is_none() {
            log::debug!("Fetching apps for admin console");
            self.apps.data = Some(self.store.list_apps().await?);
        }
        Ok(self.apps.data.as_deref().unwrap_or_default())
    }

    pub fn photo_state(&self) -> &MutationState {
        self.photo_mutation.state()
    }

    pub fn post_state(&self) -> &MutationState {
        self.post_mutation.state()
    }

    pub fn app_state(&self) -> &MutationState {
        self.app_mutation.state()
    }

    pub async fn save_photo(&mut self, photo: Photo) -> Result<Photo, AppError> {
        let saved = self.photo_mutation.run(self.store.save_photo(photo)).await?;
        self.photos.data = None;
        Ok(saved)
    }

    pub async fn delete_photo(&mut self, id: &str) -> Result<bool, AppError> {
        let removed = self.photo_mutation.run(self.store.delete_photo(id)).await?;
        self.photos.data = None;
        Ok(removed)
    }

    pub async fn save_post(&mut self, post: BlogPost) -> Result<BlogPost, AppError> {
        let saved = self.post_mutation.run(self.store.save_post(post)).await?;
        self.posts.data = None;
        Ok(saved)
    }

    pub async fn delete_post(&mut self, id: &str) -> Result<bool, AppError> {
        let removed = self.post_mutation.run(self.store.delete_post(id)).await?;
        self.posts.data = None;
        Ok(removed)
    }

    pub async fn save_app(&mut self, app: AppProject) -> Result<AppProject, AppError> {
        let saved = self.app_mutation.run(self.store.save_app(app)).await?;
        self.apps.data = None;
        Ok(saved)
    }

    pub async fn delete_app(&mut self, id: &str) -> Result<bool, AppError> {
        let removed = self.app_mutation.run(self.store.delete_app(id)).await?;
        self.apps.data = None;
        Ok(removed)
    }
}
