use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use userlists_backend::dtos::ErrorResponseDto;
use userlists_backend::{ServiceError, TokenError};

/// Message for failures whose details stay in the server log.
const GENERIC_FAILURE: &str = "Unable to complete the request";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl ApiError {
    fn is_internal(&self) -> bool {
        match self {
            ApiError::Service(e) => !e.is_client_facing(),
            ApiError::Token(TokenError::Signing(_)) => true,
            _ => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Unauthorized | ApiError::Token(TokenError::Unauthenticated) => {
                "Unauthorized".to_string()
            }
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Service(e) if e.is_client_facing() => e.to_string(),
            ApiError::Service(_) | ApiError::Token(TokenError::Signing(_)) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::Token(TokenError::Unauthenticated) => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            log::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(ErrorResponseDto {
            message: self.client_message(),
        })
    }
}
