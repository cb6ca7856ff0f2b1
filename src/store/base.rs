use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tracing::info;

use super::{memory_store::MemoryStore, mongodb_store::MongoDBStore};
use crate::config::StoreConfig;
use crate::models::{Item, NewItem, NewUser, User};

/// Failures surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// The Store trait abstracts access to the `users` and `items` collections.
///
/// Every item operation takes the owner's id and filters on it, so an item
/// is never visible to or removable by anyone but its creator.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError>;
    async fn get_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;
    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn list_items(&self, owner: &ObjectId) -> Result<Vec<Item>, StoreError>;
    async fn insert_item(&self, new_item: NewItem, owner: &ObjectId) -> Result<Item, StoreError>;
    async fn find_item(&self, id: &ObjectId, owner: &ObjectId)
        -> Result<Option<Item>, StoreError>;
    /// Returns whether a matching item was deleted.
    async fn delete_item(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, StoreError>;

    /// Release backend resources. Called once during shutdown.
    async fn shutdown(&self) {}
}

/// Creates a concrete store implementation based on the StoreConfig.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config {
        StoreConfig::MongoDB(mongo_config) => {
            let store = MongoDBStore::new(mongo_config).await?;
            info!("Successfully created MongoDB store.");
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            info!("Using in-memory store. Data will not survive a restart.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
