use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RegisterRequestDto {
    #[serde(rename = "userName", alias = "username", default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequestDto {
    #[serde(rename = "userName", alias = "username", default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// The minimal identity of a user: what login returns and what a token carries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponseDto {
    #[serde(rename = "_id")]
    pub id: u64,
    #[serde(rename = "userName")]
    pub username: String,
}
