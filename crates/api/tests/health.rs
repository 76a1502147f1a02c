//! Health endpoint and auth-rejection smoke tests.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn healthz_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (status, body) = common::request(&app, "GET", "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tickets_require_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, body) = common::request(&app, "GET", "/api/v1/tickets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    // A syntactically invalid token is rejected the same way.
    let (status, _) =
        common::request(&app, "GET", "/api/v1/tickets", Some("not-a-valid-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
