//! Credential store trait and implementations
//!
//! The store exclusively owns persisted user records. Every service call
//! round-trips to it; nothing is cached above this layer.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ListKind, User};

mod sqlite;

pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username {0} already exists")]
    DuplicateUsername(String),

    #[error("no user with id {0}")]
    NotFound(u64),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store task failed: {0}")]
    Task(String),
}

/// Trait for storing user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user, assigning a fresh id. Usernames are unique.
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError>;

    /// Add `item` to the list unless already present, returning the list afterwards.
    async fn add_to_list(
        &self,
        id: u64,
        kind: ListKind,
        item: &str,
    ) -> Result<Vec<String>, StoreError>;

    /// Remove `item` from the list if present, returning the list afterwards.
    async fn remove_from_list(
        &self,
        id: u64,
        kind: ListKind,
        item: &str,
    ) -> Result<Vec<String>, StoreError>;
}
