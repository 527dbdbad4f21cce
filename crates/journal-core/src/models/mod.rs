//! Data models for the journal service.
//!
//! - `User`: the profile returned on login
//! - `Entry`, `Author`: journal records and who wrote them
//! - `Entries`: the newest-first entry list held by the session store

pub mod entry;
pub mod user;

pub use entry::{Author, AuthorRef, Entries, Entry, UNKNOWN_AUTHOR};
pub use user::User;
