//! Registration, login and per-user list operations.

use std::sync::Arc;

use crate::auth::PasswordHasher;
use crate::dtos::{LoginRequestDto, RegisterRequestDto, UserResponseDto};
use crate::error::ServiceError;
use crate::models::ListKind;
use crate::store::{StoreError, UserStore};

pub const REGISTERED: &str = "user registered";

/// Verified against when a login names an unknown user, so both failure paths cost one hash check.
const UNKNOWN_USER_PASSWORD: &str = "unknown-user-placeholder";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    unknown_user_hash: Arc<str>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Result<Self, ServiceError> {
        let unknown_user_hash = hasher.hash(UNKNOWN_USER_PASSWORD)?.into();
        Ok(UserService {
            store,
            hasher,
            unknown_user_hash,
        })
    }

    pub async fn register_user(&self, candidate: RegisterRequestDto) -> Result<String, ServiceError> {
        let username = candidate.username.trim().to_string();
        if username.is_empty() || candidate.password.is_empty() {
            return Err(ServiceError::InvalidInput(
                "User name and password are required".to_string(),
            ));
        }
        if candidate.password != candidate.password2 {
            return Err(ServiceError::InvalidInput("Passwords do not match".to_string()));
        }

        // the UNIQUE constraint still decides races between concurrent registrations
        if self.store.find_by_username(&username).await?.is_some() {
            return Err(ServiceError::DuplicateUsername(username));
        }

        let hasher = self.hasher.clone();
        let password = candidate.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Hashing(e.to_string()))??;

        let user = self
            .store
            .insert_user(&username, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateUsername(name) => ServiceError::DuplicateUsername(name),
                other => ServiceError::Storage(other),
            })?;

        log::info!("Registered user {} with id {}", user.username, user.id);
        Ok(REGISTERED.to_string())
    }

    pub async fn check_user(&self, credentials: LoginRequestDto) -> Result<UserResponseDto, ServiceError> {
        let username = credentials.username.trim();
        let user = self.store.find_by_username(username).await?;

        let hasher = self.hasher.clone();
        let password = credentials.password;
        let stored = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.unknown_user_hash.to_string(),
        };
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| ServiceError::Hashing(e.to_string()))?;

        let user = match user {
            Some(user) if matches => user,
            Some(user) => {
                log::warn!("Wrong password for user {}", user.username);
                return Err(ServiceError::InvalidCredentials);
            }
            None => {
                log::warn!("Login attempt for unknown user {}", username);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        Ok(UserResponseDto {
            id: user.id,
            username: user.username,
        })
    }

    pub async fn get_favourites(&self, user_id: u64) -> Result<Vec<String>, ServiceError> {
        self.get_list(user_id, ListKind::Favourites).await
    }

    pub async fn add_favourite(&self, user_id: u64, item_id: &str) -> Result<Vec<String>, ServiceError> {
        self.add_to_list(user_id, ListKind::Favourites, item_id).await
    }

    pub async fn remove_favourite(&self, user_id: u64, item_id: &str) -> Result<Vec<String>, ServiceError> {
        self.remove_from_list(user_id, ListKind::Favourites, item_id).await
    }

    pub async fn get_history(&self, user_id: u64) -> Result<Vec<String>, ServiceError> {
        self.get_list(user_id, ListKind::History).await
    }

    pub async fn add_history(&self, user_id: u64, item_id: &str) -> Result<Vec<String>, ServiceError> {
        self.add_to_list(user_id, ListKind::History, item_id).await
    }

    pub async fn remove_history(&self, user_id: u64, item_id: &str) -> Result<Vec<String>, ServiceError> {
        self.remove_from_list(user_id, ListKind::History, item_id).await
    }

    async fn get_list(&self, user_id: u64, kind: ListKind) -> Result<Vec<String>, ServiceError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;
        Ok(user.list(kind).clone())
    }

    async fn add_to_list(&self, user_id: u64, kind: ListKind, item_id: &str) -> Result<Vec<String>, ServiceError> {
        let item_id = require_item(item_id)?;
        log::debug!("Adding {} to {} of user {}", item_id, kind.as_str(), user_id);
        self.store
            .add_to_list(user_id, kind, item_id)
            .await
            .map_err(|e| not_found_as_user(e, user_id))
    }

    async fn remove_from_list(&self, user_id: u64, kind: ListKind, item_id: &str) -> Result<Vec<String>, ServiceError> {
        let item_id = require_item(item_id)?;
        log::debug!("Removing {} from {} of user {}", item_id, kind.as_str(), user_id);
        self.store
            .remove_from_list(user_id, kind, item_id)
            .await
            .map_err(|e| not_found_as_user(e, user_id))
    }
}

/// Item ids are opaque: blank ids are rejected, anything else is kept byte for byte.
fn require_item(item_id: &str) -> Result<&str, ServiceError> {
    if item_id.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Item id is required".to_string()));
    }
    Ok(item_id)
}

fn not_found_as_user(e: StoreError, user_id: u64) -> ServiceError {
    match e {
        StoreError::NotFound(_) => ServiceError::UserNotFound(user_id),
        other => ServiceError::Storage(other),
    }
}
