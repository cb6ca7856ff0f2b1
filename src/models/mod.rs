pub mod item;
pub mod user;

pub use item::{Item, NewItem};
pub use user::{NewUser, User};
