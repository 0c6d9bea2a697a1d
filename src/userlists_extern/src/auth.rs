//! Auth gate for protected routes.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use userlists_backend::auth::bearer_token;
use userlists_backend::dtos::UserResponseDto;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires a valid token.
///
/// Handlers taking `AuthUser` never run for unauthenticated requests; the
/// request is answered with 401 during extraction. The identity comes only
/// from the verified claims, never from request parameters.
pub struct AuthUser(pub UserResponseDto);

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        log::error!("AppState missing from application data");
        return Err(ApiError::Unauthorized);
    };

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = bearer_token(header, &state.auth_scheme).ok_or_else(|| {
        log::warn!("Authorization header without {} scheme", state.auth_scheme);
        ApiError::Unauthorized
    })?;

    let identity = state.tokens.verify(token).map_err(|e| {
        log::warn!("Rejected token on {}: {}", req.path(), e);
        ApiError::Unauthorized
    })?;

    Ok(AuthUser(identity))
}
