mod auth_dto;
mod response_dto;
mod user_dto;

pub use auth_dto::*;
pub use response_dto::*;
pub use user_dto::*;
