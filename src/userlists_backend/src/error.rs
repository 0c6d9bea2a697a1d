//! Error types for the user service

use thiserror::Error;

use crate::store::StoreError;

/// Shared by unknown usernames and wrong passwords so the two are indistinguishable.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("User Name {0} already taken")]
    DuplicateUsername(String),

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Unable to find user with id {0}")]
    UserNotFound(u64),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ServiceError {
    /// Whether the message is safe to hand to a client as-is.
    pub fn is_client_facing(&self) -> bool {
        !matches!(self, ServiceError::Hashing(_) | ServiceError::Storage(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}
