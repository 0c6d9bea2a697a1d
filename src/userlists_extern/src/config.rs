use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use userlists_backend::auth::{
    DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_TOKEN_TTL_SECS,
};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_AUTH_SCHEME: &str = "JWT";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub bind_addr: String,
    pub store_path: Option<PathBuf>,
    pub token_ttl_secs: u64,
    pub auth_scheme: String,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("store_path", &self.store_path)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("auth_scheme", &self.auth_scheme)
            .field("hash_memory_kib", &self.hash_memory_kib)
            .field("hash_iterations", &self.hash_iterations)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::MissingSecret)?;

        Ok(Config {
            jwt_secret,
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            store_path: non_empty("STORE_PATH").map(PathBuf::from),
            token_ttl_secs: parse_number(non_empty("TOKEN_TTL_SECS"), "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
            auth_scheme: non_empty("AUTH_SCHEME").unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string()),
            hash_memory_kib: parse_number(
                non_empty("HASH_MEMORY_KIB"),
                "HASH_MEMORY_KIB",
                DEFAULT_HASH_MEMORY_KIB,
            )?,
            hash_iterations: parse_number(
                non_empty("HASH_ITERATIONS"),
                "HASH_ITERATIONS",
                DEFAULT_HASH_ITERATIONS,
            )?,
        })
    }
}

fn parse_number<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(ConfigError::InvalidNumber { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.store_path, None);
        assert_eq!(config.token_ttl_secs, 7200);
        assert_eq!(config.auth_scheme, "JWT");
        assert_eq!(config.hash_memory_kib, DEFAULT_HASH_MEMORY_KIB);
        assert_eq!(config.hash_iterations, DEFAULT_HASH_ITERATIONS);
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingSecret
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap_err(),
            ConfigError::MissingSecret
        );
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("STORE_PATH", "/var/lib/userlists/users.db"),
            ("TOKEN_TTL_SECS", "60"),
            ("AUTH_SCHEME", "Bearer"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.store_path, Some(PathBuf::from("/var/lib/userlists/users.db")));
        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.auth_scheme, "Bearer");

        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", "two hours")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "TOKEN_TTL_SECS", .. }));

        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("HASH_ITERATIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "HASH_ITERATIONS", .. }));
    }

    #[test]
    fn debug_hides_the_secret() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "hunter2")])).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
