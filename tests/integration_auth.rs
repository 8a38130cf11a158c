//! Integration tests for registration, login and the authentication gate

mod common;

use axum::http::header;

// Test 1: Full register -> login -> me flow
#[tokio::test]
async fn test_register_login_me() {
    let server = common::create_test_server().await;

    let body = common::register(&server, "client@example.com", "secret1").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "client@example.com");
    assert_eq!(body["data"]["role"], "CLIENT");
    assert!(body["data"].get("password_hash").is_none());

    let body = common::login(&server, "client@example.com", "secret1").await;
    assert_eq!(body["success"], true);

    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["email"], "client@example.com");
}

// Test 2: Duplicate registration returns a 409 envelope
#[tokio::test]
async fn test_duplicate_registration() {
    let server = common::create_test_server().await;
    common::register(&server, "client@example.com", "secret1").await;

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "client@example.com",
            "password": "different1"
        }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 409);
}

// Test 3: Registration input validation returns 400
#[tokio::test]
async fn test_registration_validation() {
    let server = common::create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({ "email": "not-an-email", "password": "secret1" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({ "email": "a@example.com", "password": "short" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

// Test 4: Unknown email and wrong password return identical responses
#[tokio::test]
async fn test_login_failures_indistinguishable() {
    let server = common::create_test_server().await;
    common::register(&server, "client@example.com", "secret1").await;

    let unknown = server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": "nobody@example.com", "password": "secret1" }))
        .await;
    let wrong = server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": "client@example.com", "password": "wrong-pass" }))
        .await;

    assert_eq!(unknown.status_code(), 401);
    assert_eq!(wrong.status_code(), 401);

    let unknown_body: serde_json::Value = unknown.json();
    let wrong_body: serde_json::Value = wrong.json();
    assert_eq!(unknown_body["message"], "Invalid credentials");
    assert_eq!(unknown_body["message"], wrong_body["message"]);
    assert_eq!(unknown_body["code"], wrong_body["code"]);
}

// Test 5: Login sets a hardened session cookie
#[tokio::test]
async fn test_login_cookie_attributes() {
    let server = common::create_test_server().await;
    common::register(&server, "client@example.com", "secret1").await;

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": "client@example.com", "password": "secret1" }))
        .await;

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a cookie")
        .to_str()
        .unwrap();

    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=86400"));
}

// Test 6: Logout clears the session
#[tokio::test]
async fn test_logout() {
    let server = common::create_test_server().await;
    common::register_and_login(&server, "client@example.com", "secret1").await;
    assert_eq!(server.get("/api/auth/me").await.status_code(), 200);

    let response = server.post("/api/auth/logout").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    assert_eq!(server.get("/api/auth/me").await.status_code(), 401);
}

// Test 7: Protected browser paths redirect anonymous users to login
#[tokio::test]
async fn test_browser_redirect_to_login() {
    let server = common::create_test_server().await;

    let response = server.get("/dashboard").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

// Test 8: Profile read and update round trip
#[tokio::test]
async fn test_profile_update() {
    let server = common::create_test_server().await;
    common::register_and_login(&server, "client@example.com", "secret1").await;

    let response = server.get("/api/users/profile").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["data"]["name"].is_null());

    let response = server
        .put("/api/users/profile")
        .json(&serde_json::json!({ "name": "Asha" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["name"], "Asha");

    // Empty update is rejected
    let response = server.put("/api/users/profile").json(&serde_json::json!({})).await;
    assert_eq!(response.status_code(), 400);
}

// Test 9: Password change takes effect on the next login
#[tokio::test]
async fn test_password_change() {
    let server = common::create_test_server().await;
    common::register_and_login(&server, "client@example.com", "secret1").await;

    let response = server
        .put("/api/users/profile")
        .json(&serde_json::json!({ "password": "new-secret" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let old = server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": "client@example.com", "password": "secret1" }))
        .await;
    assert_eq!(old.status_code(), 401);

    common::login(&server, "client@example.com", "new-secret").await;
}
