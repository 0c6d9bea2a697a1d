use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use userlists::routes::{self, LOGIN_SUCCESSFUL};
use userlists::{AppState, Config};
use userlists_backend::auth::{TokenService, DEFAULT_TOKEN_TTL_SECS};
use userlists_backend::dtos::UserResponseDto;
use userlists_backend::store::SqliteStore;

const SECRET: &str = "integration-secret";

fn config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "HASH_MEMORY_KIB" => Some("64".to_string()),
        "HASH_ITERATIONS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap()
}

fn state() -> web::Data<AppState> {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    web::Data::new(AppState::new(store, &config()).unwrap())
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(routes::configure),
        )
        .await
    };
}

fn auth(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("JWT {}", token))
}

#[actix_web::test]
async fn alice_scenario() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({ "userName": "alice", "password": "p1", "password2": "p1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "user registered" }));

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({ "userName": "alice", "password": "p1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], LOGIN_SUCCESSFUL);
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/api/user/favourites/item42")
        .insert_header(auth(&token))
        .to_request();
    let list: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, vec!["item42"]);

    let req = test::TestRequest::get()
        .uri("/api/user/favourites")
        .insert_header(auth(&token))
        .to_request();
    let list: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, vec!["item42"]);

    let req = test::TestRequest::delete()
        .uri("/api/user/favourites/item42")
        .insert_header(auth(&token))
        .to_request();
    let list: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert!(list.is_empty());
}

#[actix_web::test]
async fn history_routes() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({ "username": "bob", "password": "pw", "password2": "pw" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let token = state
        .tokens
        .issue(&UserResponseDto { id: 1, username: "bob".to_string() })
        .unwrap();

    for item in ["ep1", "ep2", "ep1"] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/user/history/{}", item))
            .insert_header(auth(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/user/history")
        .insert_header(auth(&token))
        .to_request();
    let list: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, vec!["ep1", "ep2"]);

    let req = test::TestRequest::delete()
        .uri("/api/user/history/never-watched")
        .insert_header(auth(&token))
        .to_request();
    let list: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, vec!["ep1", "ep2"]);

    let req = test::TestRequest::get()
        .uri("/api/user/favourites")
        .insert_header(auth(&token))
        .to_request();
    let list: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert!(list.is_empty());
}

#[actix_web::test]
async fn registration_errors_use_the_message_envelope() {
    let state = state();
    let app = app!(state);

    let register = json!({ "userName": "alice", "password": "p1", "password2": "p1" });
    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(&register)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(&register)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "User Name alice already taken" }));

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({ "userName": "carol", "password": "a", "password2": "b" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Passwords do not match");

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid request body");
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({ "userName": "alice", "password": "p1", "password2": "p1" }))
        .to_request();
    test::call_service(&app, req).await;

    let mut bodies = Vec::new();
    for (name, password) in [("alice", "wrong"), ("nobody", "p1")] {
        let req = test::TestRequest::post()
            .uri("/api/user/login")
            .set_json(json!({ "userName": name, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert!(bodies[0].get("token").is_none());
}

#[actix_web::test]
async fn protected_routes_reject_bad_tokens() {
    let state = state();
    let app = app!(state);

    let foreign = TokenService::new("some-other-secret", DEFAULT_TOKEN_TTL_SECS)
        .unwrap()
        .issue(&UserResponseDto { id: 1, username: "alice".to_string() })
        .unwrap();
    let expired = state
        .tokens
        .issue_at(&UserResponseDto { id: 1, username: "alice".to_string() }, 1_000)
        .unwrap();
    let valid = state
        .tokens
        .issue(&UserResponseDto { id: 1, username: "alice".to_string() })
        .unwrap();

    let headers = [
        None,
        Some(format!("JWT {}", foreign)),
        Some(format!("JWT {}", expired)),
        Some(format!("Bearer {}", valid)),
        Some("JWT not-a-token".to_string()),
    ];

    for value in headers {
        let mut req = test::TestRequest::put().uri("/api/user/favourites/item42");
        if let Some(value) = value {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Unauthorized" }));
    }
}

#[actix_web::test]
async fn token_for_missing_user_is_a_client_error() {
    let state = state();
    let app = app!(state);

    let token = state
        .tokens
        .issue(&UserResponseDto { id: 77, username: "ghost".to_string() })
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/user/history")
        .insert_header(auth(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unable to find user with id 77");
}

#[actix_web::test]
async fn file_store_keeps_users_between_starts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.db");
    let path_str = path.to_str().unwrap().to_string();

    let config = Config::from_lookup(move |key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "HASH_MEMORY_KIB" => Some("64".to_string()),
        "HASH_ITERATIONS" => Some("1".to_string()),
        "STORE_PATH" => Some(path_str.clone()),
        _ => None,
    })
    .unwrap();

    {
        let state = web::Data::new(AppState::from_config(&config).unwrap());
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/user/register")
            .set_json(json!({ "userName": "alice", "password": "p1", "password2": "p1" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let state = web::Data::new(AppState::from_config(&config).unwrap());
    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({ "userName": "alice", "password": "p1" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
