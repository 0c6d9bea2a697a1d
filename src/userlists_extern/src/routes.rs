use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use userlists_backend::dtos::{AuthResponseDto, LoginRequestDto, MessageResponseDto, RegisterRequestDto};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub const LOGIN_SUCCESSFUL: &str = "login successful";

/// Register every `/api/user` route plus the JSON body config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(
            web::scope("/api/user")
                .route("/register", web::post().to(register))
                .route("/login", web::post().to(login))
                .route("/favourites", web::get().to(get_favourites))
                .route("/favourites/{id}", web::put().to(add_favourite))
                .route("/favourites/{id}", web::delete().to(remove_favourite))
                .route("/history", web::get().to(get_history))
                .route("/history/{id}", web::put().to(add_history))
                .route("/history/{id}", web::delete().to(remove_history)),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected request body: {}", err);
    ApiError::BadRequest("Invalid request body".to_string()).into()
}

async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequestDto>,
) -> Result<HttpResponse, ApiError> {
    log::debug!("Received register request for username: {}", req.username);

    let message = state.service.register_user(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponseDto { message }))
}

async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequestDto>,
) -> Result<HttpResponse, ApiError> {
    log::debug!("Received login request for username: {}", req.username);

    let identity = state.service.check_user(req.into_inner()).await?;
    let token = state.tokens.issue(&identity)?;

    log::info!("Login successful for username: {}", identity.username);
    Ok(HttpResponse::Ok().json(AuthResponseDto {
        message: LOGIN_SUCCESSFUL.to_string(),
        token,
    }))
}

async fn get_favourites(
    AuthUser(user): AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let list = state.service.get_favourites(user.id).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn add_favourite(
    AuthUser(user): AuthUser,
    state: web::Data<AppState>,
    item: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let list = state.service.add_favourite(user.id, &item).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn remove_favourite(
    AuthUser(user): AuthUser,
    state: web::Data<AppState>,
    item: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let list = state.service.remove_favourite(user.id, &item).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn get_history(
    AuthUser(user): AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let list = state.service.get_history(user.id).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn add_history(
    AuthUser(user): AuthUser,
    state: web::Data<AppState>,
    item: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let list = state.service.add_history(user.id, &item).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn remove_history(
    AuthUser(user): AuthUser,
    state: web::Data<AppState>,
    item: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let list = state.service.remove_history(user.id, &item).await?;
    Ok(HttpResponse::Ok().json(list))
}
