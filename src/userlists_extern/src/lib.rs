//! HTTP gateway for the user list service.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::{AppState, StartupError};
