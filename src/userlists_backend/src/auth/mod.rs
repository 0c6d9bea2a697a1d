mod password;
mod token;

pub use password::{PasswordHasher, DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB};
pub use token::{bearer_token, now_secs, Claims, TokenService, DEFAULT_TOKEN_TTL_SECS};
