//! Stored entity types and their rule sets

mod contact;
mod user;

pub use contact::{Contact, ContactFields};
pub use user::{User, UserFields};
