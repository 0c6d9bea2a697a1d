//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, so verification always uses the salt and
//! cost parameters embedded in the stored value.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::ServiceError;

pub const DEFAULT_HASH_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;
pub const DEFAULT_HASH_ITERATIONS: u32 = Params::DEFAULT_T_COST;

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        PasswordHasher {
            argon2: Argon2::default(),
            #[cfg(test)]
            verifications: Arc::default(),
        }
    }
}

impl PasswordHasher {
    /// Argon2id with the given memory cost (KiB) and iteration count.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| ServiceError::Hashing(e.to_string()))?;

        Ok(PasswordHasher {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            #[cfg(test)]
            verifications: Arc::default(),
        })
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::Hashing(e.to_string()))
    }

    /// Check `password` against a stored hash. A malformed stored value never verifies.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);

        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}
