//! Integration tests for the password reset lifecycle

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use stock_dashboard_backend::repositories::ResetTokenRepository;
use stock_dashboard_backend::services::ResetService;

/// Insert a reset token directly and return its plaintext, standing in
/// for the link a real user would receive by email.
async fn issue_token(app: &common::TestApp, email: &str, ttl_secs: i64) -> String {
    let user_id = app.user_id_by_email(email).await;
    let token = ResetService::generate_token();
    ResetTokenRepository::insert(
        &app.pool,
        user_id,
        &ResetService::token_digest(&token),
        Utc::now() + Duration::seconds(ttl_secs),
    )
    .await
    .expect("failed to insert reset token");
    token
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_forgot_password_unknown_email_reports_success_without_token() {
    let app = common::TestApp::new().await;

    let email = format!("ghost_{}@example.com", uuid::Uuid::new_v4());
    let body = json!({ "email": email });

    let (status, response) = app.post("/auth/forgot-password", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], true);

    assert_eq!(app.reset_token_count(&email).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_forgot_password_creates_token_expiring_in_one_hour() {
    let app = common::TestApp::new().await;

    let email = format!("forgot_{}@example.com", uuid::Uuid::new_v4());
    app.register_user(&email, "SecurePassword123!", "Forgot Test")
        .await;

    let body = json!({ "email": email });
    let (status, _) = app.post("/auth/forgot-password", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.reset_token_count(&email).await, 1);

    let ttl_secs = sqlx::query_scalar::<_, f64>(
        "SELECT EXTRACT(EPOCH FROM (t.expires_at - t.created_at))::float8 \
         FROM password_reset_tokens t JOIN users u ON u.id = t.user_id \
         WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert!((ttl_secs - 3600.0).abs() < 5.0, "unexpected ttl: {}", ttl_secs);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_reset_lifecycle_rotates_password_once() {
    let app = common::TestApp::new().await;

    let email = format!("lifecycle_{}@example.com", uuid::Uuid::new_v4());
    app.register_user(&email, "OldPassword123!", "Lifecycle Test")
        .await;

    let token = issue_token(&app, &email, 3600).await;

    // Consume the token
    let body = json!({ "password": "NewPassword456!" });
    let (status, response) = app
        .post(&format!("/auth/reset/{}", token), &body.to_string())
        .await;
    assert_eq!(status, StatusCode::OK, "reset failed: {}", response);

    // Old password no longer works
    let old_login = json!({ "email": email, "password": "OldPassword123!" });
    let (status, _) = app.post("/auth/login", &old_login.to_string()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // New password does
    app.login_user(&email, "NewPassword456!").await;

    // Replaying the same token fails: single use
    let (status, _) = app
        .post(&format!("/auth/reset/{}", token), &body.to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_expired_token_always_fails() {
    let app = common::TestApp::new().await;

    let email = format!("expired_{}@example.com", uuid::Uuid::new_v4());
    app.register_user(&email, "SecurePassword123!", "Expired Test")
        .await;

    // Already expired at issuance
    let token = issue_token(&app, &email, -60).await;

    let body = json!({ "password": "NewPassword456!" });
    let (status, _) = app
        .post(&format!("/auth/reset/{}", token), &body.to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The original password still works
    app.login_user(&email, "SecurePassword123!").await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unknown_token_fails() {
    let app = common::TestApp::new().await;

    let body = json!({ "password": "NewPassword456!" });
    let (status, _) = app
        .post(
            &format!("/auth/reset/{}", ResetService::generate_token()),
            &body.to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_outstanding_tokens_stay_valid_until_used() {
    let app = common::TestApp::new().await;

    let email = format!("multi_{}@example.com", uuid::Uuid::new_v4());
    app.register_user(&email, "SecurePassword123!", "Multi Test")
        .await;

    let first = issue_token(&app, &email, 3600).await;
    let second = issue_token(&app, &email, 3600).await;

    // Consuming the first token leaves the second live
    let body = json!({ "password": "NewPassword456!" });
    let (status, _) = app
        .post(&format!("/auth/reset/{}", first), &body.to_string())
        .await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({ "password": "NewerPassword789!" });
    let (status, _) = app
        .post(&format!("/auth/reset/{}", second), &body.to_string())
        .await;
    assert_eq!(status, StatusCode::OK);

    app.login_user(&email, "NewerPassword789!").await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_expired_tokens_are_swept() {
    let app = common::TestApp::new().await;

    let email = format!("sweep_{}@example.com", uuid::Uuid::new_v4());
    app.register_user(&email, "SecurePassword123!", "Sweep Test")
        .await;

    issue_token(&app, &email, -60).await;
    issue_token(&app, &email, 3600).await;

    let removed = ResetTokenRepository::delete_expired(&app.pool).await.unwrap();
    assert!(removed >= 1);
    assert_eq!(app.reset_token_count(&email).await, 1);
}
