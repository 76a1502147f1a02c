//! Shared helpers for API integration tests.
//!
//! Builds the full application router with the same middleware stack as
//! production, against the test database pool that `#[sqlx::test]`
//! provisions.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use helpdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use helpdesk_api::config::ServerConfig;
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_db::models::company::CreateCompany;
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{CompanyRepo, UserRepo};
use helpdesk_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        site_url: "http://localhost:5173".to_string(),
        jwt: test_jwt_config(),
    }
}

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build the full application router against the given pool.
///
/// The event bus has no subscribers here, so published events are dropped —
/// handlers must succeed regardless.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

/// Mint an access token for a user id + role.
pub fn token_for(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_jwt_config()).expect("token generation")
}

/// Seed a company and return its id.
pub async fn seed_company(pool: &PgPool, code: &str) -> i64 {
    CompanyRepo::create(
        pool,
        &CreateCompany {
            name: format!("Company {code}"),
            code: code.to_string(),
            contact_person: None,
            contact_email: None,
            contact_phone: None,
        },
    )
    .await
    .expect("create company")
    .id
}

/// Seed a user with a throwaway password hash and return its id.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str, company_id: Option<i64>) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            password: "unused".to_string(),
            role: Some(role.to_string()),
            company_id,
            phone: None,
            feishu_id: None,
            enterprise_wechat_id: None,
        },
        "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAA",
    )
    .await
    .expect("create user")
    .id
}

/// Issue one request against the app and return status + parsed JSON body.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
