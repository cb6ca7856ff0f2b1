use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A signed-up user, as stored in the `users` collection.
///
/// Users are created on first login and never modified afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Subject identifier issued by the identity provider.
    pub google_id: String,
    pub username: String,
    pub email: String,
}

/// The fields needed to create a user. The internal id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub google_id: String,
    pub username: String,
    pub email: String,
}

impl User {
    /// Attach a freshly generated internal id to a new user record.
    pub fn from_new(new_user: NewUser) -> Self {
        User {
            id: ObjectId::new(),
            google_id: new_user.google_id,
            username: new_user.username,
            email: new_user.email,
        }
    }
}
