//! Database entities.

pub mod micropost;
pub mod relationship;
pub mod user;

pub use micropost::Entity as Micropost;
pub use relationship::Entity as Relationship;
pub use user::Entity as User;
