use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::{Store, StoreError};
use crate::models::{Item, NewItem, NewUser, User};

/// A `Store` that keeps everything in process memory.
///
/// Items are kept in insertion order, which is also the order `list_items`
/// returns them in.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<ObjectId, User>>,
    items: RwLock<Vec<Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.values().find(|u| u.google_id == google_id).cloned())
    }

    async fn get_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.get(id).cloned())
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User::from_new(new_user);
        self.users
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_items(&self, owner: &ObjectId) -> Result<Vec<Item>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items.iter().filter(|i| &i.user_id == owner).cloned().collect())
    }

    async fn insert_item(&self, new_item: NewItem, owner: &ObjectId) -> Result<Item, StoreError> {
        let item = Item::create(new_item, *owner);
        self.items
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(item.clone());
        Ok(item)
    }

    async fn find_item(
        &self,
        id: &ObjectId,
        owner: &ObjectId,
    ) -> Result<Option<Item>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items
            .iter()
            .find(|i| &i.id == id && &i.user_id == owner)
            .cloned())
    }

    async fn delete_item(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        let before = items.len();
        items.retain(|i| !(&i.id == id && &i.user_id == owner));
        Ok(items.len() < before)
    }
}
