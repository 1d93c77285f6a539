//! Password login over JSON and through the sign-in form.

mod common;

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use common::{body_json, body_text, get_with_cookie, post_form, post_json, TEST_PASSWORD};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn json_login_returns_token(pool: PgPool) {
    let (user, _) = common::create_user(&pool, "ada@example.com").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ADA@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["email"], "ada@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn json_login_rejects_bad_credentials_uniformly(pool: PgPool) {
    common::create_user(&pool, "ada@example.com").await;
    let app = common::build_test_app(pool);

    let wrong_password = serde_json::json!({ "email": "ada@example.com", "password": "nope" });
    let response = post_json(app.clone(), "/api/v1/auth/login", wrong_password).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let first = body_json(response).await;

    let unknown_user = serde_json::json!({ "email": "bob@example.com", "password": "nope" });
    let response = post_json(app, "/api/v1/auth/login", unknown_user).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let second = body_json(response).await;

    assert_eq!(first, second);
    assert_eq!(first["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn form_login_sets_cookie_that_skips_sign_in(pool: PgPool) {
    common::create_user(&pool, "ada@example.com").await;
    let app = common::build_test_app(pool);

    let form = format!("email=ada%40example.com&password={TEST_PASSWORD}");
    let response = post_form(app.clone(), "/login", &form).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/dashboard");
    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));

    // Replay only the `name=value` pair, as a browser would.
    let pair = set_cookie.split(';').next().unwrap();
    let response = get_with_cookie(app, "/login", pair).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/dashboard");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn form_login_failure_rerenders_with_message(pool: PgPool) {
    common::create_user(&pool, "ada@example.com").await;
    let app = common::build_test_app(pool);

    let response = post_form(app, "/login", "email=ada%40example.com&password=wrong").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!response.headers().contains_key(SET_COOKIE));
    let html = body_text(response).await;
    assert!(html.contains("Invalid email or password"));
    assert!(html.contains(r#"value="ada@example.com""#));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn forged_cookie_still_sees_the_form(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_with_cookie(app, "/login", "luminar_session=forged").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Sign in to Luminar"));
}
