//! Core of the user list service: credentials, tokens, storage and the
//! operations the HTTP layer exposes.

pub mod auth;
pub mod dtos;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use error::{ServiceError, TokenError};
pub use service::UserService;
