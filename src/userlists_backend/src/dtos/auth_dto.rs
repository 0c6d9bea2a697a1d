use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponseDto {
    pub message: String,
    pub token: String,
}
