//! Stateless JWT issue and verification (HS256).

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use jwt::{AlgorithmType, Header, SignWithKey, Token, Verified, VerifyWithKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::dtos::UserResponseDto;
use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime when nothing else is configured: two hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 2 * 60 * 60;

/// Claims carried by every token. Decoding fails unless all fields are present.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub id: u64,
    #[serde(rename = "userName")]
    pub username: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Clone)]
pub struct TokenService {
    key: HmacSha256,
    ttl_secs: u64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, TokenError> {
        let key = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(TokenService { key, ttl_secs })
    }

    pub fn issue(&self, identity: &UserResponseDto) -> Result<String, TokenError> {
        self.issue_at(identity, now_secs())
    }

    pub fn issue_at(&self, identity: &UserResponseDto, now: u64) -> Result<String, TokenError> {
        let claims = Claims {
            id: identity.id,
            username: identity.username.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        let header = Header {
            algorithm: AlgorithmType::Hs256,
            ..Default::default()
        };

        let signed = Token::new(header, claims)
            .sign_with_key(&self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(signed.as_str().to_string())
    }

    pub fn verify(&self, token: &str) -> Result<UserResponseDto, TokenError> {
        self.verify_at(token, now_secs())
    }

    /// Accepts the token while `now <= exp`; every failure is `Unauthenticated`.
    pub fn verify_at(&self, token: &str, now: u64) -> Result<UserResponseDto, TokenError> {
        let verified: Token<Header, Claims, Verified> = token
            .verify_with_key(&self.key)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                TokenError::Unauthenticated
            })?;

        let claims = verified.claims();
        if claims.username.is_empty() {
            log::debug!("Token rejected: empty userName claim");
            return Err(TokenError::Unauthenticated);
        }
        if now > claims.exp {
            log::debug!("Token for user {} expired at {}", claims.id, claims.exp);
            return Err(TokenError::Unauthenticated);
        }

        Ok(UserResponseDto {
            id: claims.id,
            username: claims.username.clone(),
        })
    }
}

/// Pull the token out of an Authorization header value of the form `<scheme> <token>`.
/// The scheme is matched case-insensitively.
pub fn bearer_token<'a>(header: &'a str, scheme: &str) -> Option<&'a str> {
    let (found_scheme, token) = header.trim().split_once(' ')?;
    if !found_scheme.eq_ignore_ascii_case(scheme) {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
