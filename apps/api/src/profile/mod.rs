//! Profile persistence and CV import.

pub mod handlers;
pub mod import;
pub mod prompts;
pub mod store;

pub use store::{FileProfileStore, ProfileEnvelope, ProfileStore, RedisProfileStore, StorageError};
