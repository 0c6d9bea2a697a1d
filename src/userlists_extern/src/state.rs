use std::sync::Arc;

use thiserror::Error;
use userlists_backend::auth::{PasswordHasher, TokenService};
use userlists_backend::store::{SqliteStore, StoreError, UserStore};
use userlists_backend::{ServiceError, TokenError, UserService};

use crate::config::{Config, ConfigError};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open user store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build user service: {0}")]
    Service(#[from] ServiceError),

    #[error("failed to build token service: {0}")]
    Token(#[from] TokenError),
}

/// Everything a handler needs, built once before the server starts.
pub struct AppState {
    pub service: UserService,
    pub tokens: TokenService,
    pub auth_scheme: String,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, config: &Config) -> Result<Self, StartupError> {
        let hasher = PasswordHasher::new(config.hash_memory_kib, config.hash_iterations)?;
        Ok(AppState {
            service: UserService::new(store, hasher)?,
            tokens: TokenService::new(&config.jwt_secret, config.token_ttl_secs)?,
            auth_scheme: config.auth_scheme.clone(),
        })
    }

    /// Open the configured store and build the state around it.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let store: Arc<dyn UserStore> = match &config.store_path {
            Some(path) => Arc::new(SqliteStore::open(path)?),
            None => {
                log::warn!("STORE_PATH not set, users are kept in memory only");
                Arc::new(SqliteStore::in_memory()?)
            }
        };
        Self::new(store, config)
    }
}
