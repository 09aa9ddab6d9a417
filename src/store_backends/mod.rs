pub mod json_file;
pub mod memory;

use crate::config::{AppConfig, StoreKind};
use crate::error::AppError;
use crate::store::Store;
use std::sync::Arc;

pub fn build_store(config: &AppConfig) -> Result<Arc<dyn Store>, AppError> {
    log::info!("Using {:?} store", config.store);
    let store: Arc<dyn Store> = match config.store {
        StoreKind::Json => Arc::new(json_file::JsonFileStore::new(config)?),
        StoreKind::Memory => Arc::new(memory::MemoryStore::new()),
    };
    Ok(store)
}
