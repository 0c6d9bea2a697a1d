use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponseDto {
    pub message: String,
}

/// Envelope for every error the API returns.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponseDto {
    pub message: String,
}
