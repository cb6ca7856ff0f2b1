//! Serialisable view models returned by the page and item handlers.
//!
//! These are the only shapes that leave the process: internal ids are
//! rendered as hex strings and no owner reference is exposed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Item, User};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        ItemView {
            id: item.id.to_hex(),
            title: item.title.clone(),
            description: item.description.clone(),
            creation_date: item.created_at(),
        }
    }
}

/// `GET /`: the user is absent when nobody is signed in.
#[derive(Serialize, Debug)]
pub struct HomeView {
    pub user: Option<UserView>,
}

/// `GET /dashboard`
#[derive(Serialize, Debug)]
pub struct DashboardView {
    pub user: UserView,
    pub items: Vec<ItemView>,
}

impl DashboardView {
    pub fn new(user: &User, items: &[Item]) -> Self {
        DashboardView {
            user: user.into(),
            items: items.iter().map(ItemView::from).collect(),
        }
    }
}

/// `GET /items/{id}`
#[derive(Serialize, Debug)]
pub struct ItemPageView {
    pub user: UserView,
    pub item: ItemView,
}

/// `GET /profile`
#[derive(Serialize, Debug)]
pub struct ProfileView {
    pub user: UserView,
}
