use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize};

/// An item owned by a single user, as stored in the `items` collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Older documents may hold `null` or omit these; both read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub creation_date: bson::DateTime,
    /// Internal id of the owning user.
    pub user_id: ObjectId,
}

/// Request body for creating an item. Owner and timestamp are never taken
/// from the client, so unknown fields are simply dropped.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub description: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Item {
    /// Stamp a new item with a fresh id, the current time and its owner.
    pub fn create(new_item: NewItem, owner: ObjectId) -> Self {
        Item {
            id: ObjectId::new(),
            title: new_item.title,
            description: new_item.description,
            creation_date: bson::DateTime::now(),
            user_id: owner,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.creation_date.timestamp_millis()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_stamps_owner_and_time() {
        let owner = ObjectId::new();
        let before = Utc::now().timestamp_millis();
        let item = Item::create(
            NewItem {
                title: "Groceries".to_string(),
                description: "milk, eggs".to_string(),
            },
            owner,
        );
        assert_eq!(item.user_id, owner);
        assert!(item.created_at().timestamp_millis() >= before);
    }

    #[test]
    fn test_new_item_ignores_client_owner_fields() {
        let body = r#"{"title":"t","description":"d","userId":"abc","creationDate":"1970-01-01"}"#;
        let new_item: NewItem = serde_json::from_str(body).expect("extra fields are ignored");
        assert_eq!(new_item.title, "t");
        assert_eq!(new_item.description, "d");
    }

    #[test]
    fn test_item_document_shape() {
        let item = Item::create(
            NewItem {
                title: "t".to_string(),
                description: "d".to_string(),
            },
            ObjectId::new(),
        );
        let doc = bson::to_document(&item).expect("item should serialize");
        assert!(doc.get_datetime("creationDate").is_ok());
        assert_eq!(doc.get_object_id("userId").unwrap(), item.user_id);
        assert_eq!(doc.get_object_id("_id").unwrap(), item.id);
    }

    #[test]
    fn test_item_with_null_or_missing_text_fields_loads() {
        let doc = bson::doc! {
            "_id": ObjectId::new(),
            "title": bson::Bson::Null,
            "creationDate": bson::DateTime::now(),
            "userId": ObjectId::new(),
        };
        let item: Item = bson::from_document(doc).expect("legacy item should load");
        assert_eq!(item.title, "");
        assert_eq!(item.description, "");
    }
}
