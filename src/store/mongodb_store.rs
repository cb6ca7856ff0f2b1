use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Store, StoreError};
use crate::models::{Item, NewItem, NewUser, User};

/// The config struct for MongoDB connections.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct MongoDBConfig {
    pub uri: String,
    /// Database name. Falls back to the default database named in the URI.
    pub database: Option<String>,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_app_name() -> String {
    "itemkeeper".to_string()
}

/// A concrete `Store` implementation that uses MongoDB.
///
/// One `Client` is shared by every request; the driver pools connections
/// internally.
pub struct MongoDBStore {
    client: Client,
    user_collection: Collection<User>,
    item_collection: Collection<Item>,
}

impl MongoDBStore {
    /// Connects to MongoDB and checks the deployment is reachable, so a bad
    /// URI or unreachable server fails at startup instead of on first request.
    pub async fn new(config: &MongoDBConfig) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB (app name '{}')", config.app_name);

        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.app_name = Some(config.app_name.clone());
        client_options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(client_options)?;
        let database = match &config.database {
            Some(name) => client.database(name),
            None => client.default_database().ok_or_else(|| {
                StoreError::Unavailable(
                    "no database configured and none named in the MongoDB URI".to_string(),
                )
            })?,
        };

        database.run_command(doc! { "ping": 1 }, None).await?;
        info!(
            "MongoDB connection established, using database '{}'.",
            database.name()
        );

        Ok(Self {
            client,
            user_collection: database.collection::<User>("users"),
            item_collection: database.collection::<Item>("items"),
        })
    }
}

/// Filter matching one item, but only if it belongs to `owner`.
fn owned_item_filter(id: &ObjectId, owner: &ObjectId) -> Document {
    doc! { "_id": *id, "userId": *owner }
}

fn owner_filter(owner: &ObjectId) -> Document {
    doc! { "userId": *owner }
}

#[async_trait]
impl Store for MongoDBStore {
    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .user_collection
            .find_one(doc! { "googleId": google_id }, None)
            .await?)
    }

    async fn get_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.user_collection.find_one(doc! { "_id": *id }, None).await?)
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User::from_new(new_user);
        self.user_collection.insert_one(&user, None).await?;
        debug!("Inserted user document {}", user.id);
        Ok(user)
    }

    async fn list_items(&self, owner: &ObjectId) -> Result<Vec<Item>, StoreError> {
        let cursor = self.item_collection.find(owner_filter(owner), None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_item(&self, new_item: NewItem, owner: &ObjectId) -> Result<Item, StoreError> {
        let item = Item::create(new_item, *owner);
        self.item_collection.insert_one(&item, None).await?;
        Ok(item)
    }

    async fn find_item(
        &self,
        id: &ObjectId,
        owner: &ObjectId,
    ) -> Result<Option<Item>, StoreError> {
        Ok(self
            .item_collection
            .find_one(owned_item_filter(id, owner), None)
            .await?)
    }

    async fn delete_item(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, StoreError> {
        let result = self
            .item_collection
            .delete_one(owned_item_filter(id, owner), None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn shutdown(&self) {
        info!("Closing MongoDB connection.");
        self.client.clone().shutdown().await;
        info!("MongoDB connection closed.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_item_filter_scopes_by_owner() {
        let id = ObjectId::new();
        let owner = ObjectId::new();
        let filter = owned_item_filter(&id, &owner);
        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(filter.get_object_id("userId").unwrap(), owner);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_owner_filter() {
        let owner = ObjectId::new();
        assert_eq!(owner_filter(&owner), doc! { "userId": owner });
    }

    #[test]
    fn test_config_defaults_app_name() {
        let config: MongoDBConfig =
            serde_json::from_str(r#"{"uri": "mongodb://localhost:27017/items"}"#).unwrap();
        assert_eq!(config.app_name, "itemkeeper");
        assert!(config.database.is_none());
    }
}
