mod common;

use common::{parse_body, TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};
use serde_json::json;

#[tokio::test]
async fn test_default_admin_can_log_in() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/api/auth/login", Some(json!({
        "username": ADMIN_USERNAME,
        "password": ADMIN_PASSWORD
    }))).await;
    assert_eq!(response.status(), 200);

    let body = parse_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["mustChangePassword"], true);
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_bootstrap_does_not_duplicate_admin() {
    let app = TestApp::new().await;

    let created = app.state.auth_service.ensure_default_admin("second-admin", "whatever123").await.unwrap();
    assert!(!created);

    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(admins, 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;

    let wrong_password = app.request("POST", "/api/auth/login", Some(json!({
        "username": ADMIN_USERNAME, "password": "not-the-password"
    }))).await;
    let unknown_user = app.request("POST", "/api/auth/login", Some(json!({
        "username": "ghost", "password": ADMIN_PASSWORD
    }))).await;

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);
    assert_eq!(parse_body(wrong_password).await, parse_body(unknown_user).await);
}

#[tokio::test]
async fn test_change_password_rotates_credential() {
    let app = TestApp::new().await;

    let login = parse_body(app.request("POST", "/api/auth/login", Some(json!({
        "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD
    }))).await).await;
    let user_id = login["user"]["id"].as_i64().unwrap();

    let response = app.request("POST", "/api/auth/change-password", Some(json!({
        "userId": user_id, "newPassword": "short"
    }))).await;
    assert_eq!(response.status(), 400);
    assert_eq!(parse_body(response).await["code"], "ValidationFailed");

    let response = app.request("POST", "/api/auth/change-password", Some(json!({
        "userId": user_id, "newPassword": "a much better secret"
    }))).await;
    assert_eq!(response.status(), 200);
    assert_eq!(parse_body(response).await["success"], true);

    let old = app.request("POST", "/api/auth/login", Some(json!({
        "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD
    }))).await;
    assert_eq!(old.status(), 401);

    let new = app.request("POST", "/api/auth/login", Some(json!({
        "username": ADMIN_USERNAME, "password": "a much better secret"
    }))).await;
    assert_eq!(new.status(), 200);
    assert_eq!(parse_body(new).await["user"]["mustChangePassword"], false);
}

#[tokio::test]
async fn test_change_password_for_unknown_user() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/api/auth/change-password", Some(json!({
        "userId": 9999, "newPassword": "long enough secret"
    }))).await;
    assert_eq!(response.status(), 404);
}
