//! 사용자 관리 API 통합 테스트.
//!
//! 메모리 디렉터리 위에서 전체 라우터를 구성해
//! 가입, 로그인, 역할별 접근 제어를 요청 단위로 검증합니다.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use roster_api::{create_api_router, AppState, ApiErrorResponse, InMemoryUserDirectory, TokenVerifier};
use roster_core::{JwtSettings, Role, UserSummary};
use serde_json::{json, Value};
use tower::ServiceExt;

fn jwt_settings() -> JwtSettings {
    JwtSettings::new(
        "integration-test-secret",
        "UserManagementAPI",
        "UserManagementAPIUsers",
        60,
    )
}

fn app() -> Router {
    let state = AppState::new(&jwt_settings(), Arc::new(InMemoryUserDirectory::new())).unwrap();
    create_api_router().with_state(Arc::new(state))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, email: &str, password: &str, designation: &str) -> Response {
    send(
        app,
        request(
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({
                "name": "Test User",
                "email": email,
                "password": password,
                "dateOfBirth": "1995-06-30",
                "designation": designation
            })),
        ),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> Response {
    send(
        app,
        request(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": email, "password": password })),
        ),
    )
    .await
}

async fn token_for(app: &Router, email: &str, password: &str, designation: &str) -> String {
    assert_eq!(register(app, email, password, designation).await.status(), StatusCode::OK);
    let response = login(app, email, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_and_login_issues_teacher_token() {
    let app = app();
    assert_eq!(register(&app, "a@x.com", "pw1", "Teacher").await.status(), StatusCode::OK);

    let response = login(&app, "a@x.com", "pw1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(body["role"], "Teacher");
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["email"], "a@x.com");

    let claims = TokenVerifier::new(&jwt_settings())
        .unwrap()
        .verify(body["token"].as_str().unwrap(), Utc::now())
        .unwrap();
    assert_eq!(claims.role, Role::Teacher);
    assert_eq!(claims.sub, "a@x.com");
}

#[tokio::test]
async fn login_failures_share_status_and_message() {
    let app = app();
    register(&app, "a@x.com", "pw1", "Teacher").await;

    let wrong_password = login(&app, "a@x.com", "wrong").await;
    let unknown_email = login(&app, "nobody@x.com", "pw1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: ApiErrorResponse = json_body(wrong_password).await;
    let b: ApiErrorResponse = json_body(unknown_email).await;
    assert_eq!(a.code, "INVALID_CREDENTIALS");
    assert_eq!(a.code, b.code);
    assert_eq!(a.message, "Invalid email or password.");
    assert_eq!(a.message, b.message);
}

#[tokio::test]
async fn register_with_unknown_role_is_rejected_before_storage() {
    let app = app();
    let response = register(&app, "admin@x.com", "pw1", "Admin").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ApiErrorResponse = json_body(response).await;
    assert_eq!(error.code, "INVALID_ROLE");

    // 저장되지 않았으므로 같은 이메일로 로그인할 수 없음
    assert_eq!(login(&app, "admin@x.com", "pw1").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(register(&app, "admin@x.com", "pw1", "Student").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let app = app();
    assert_eq!(register(&app, "dup@x.com", "pw1", "Student").await.status(), StatusCode::OK);

    let response = register(&app, "DUP@x.com", "pw2", "Student").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ApiErrorResponse = json_body(response).await;
    assert_eq!(error.code, "DUPLICATE_IDENTITY");

    // 대소문자를 바꾼 이메일로도 로그인 가능
    assert_eq!(login(&app, "Dup@X.com", "pw1").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_requires_authentication() {
    let app = app();
    let response = send(&app, request(Method::GET, "/api/users", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request(Method::GET, "/api/users", Some("garbage"), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn student_can_read_but_not_modify() {
    let app = app();
    let student = token_for(&app, "s@x.com", "pw1", "Student").await;
    register(&app, "victim@x.com", "pw1", "Student").await;

    let response = send(&app, request(Method::GET, "/api/users", Some(&student), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let users: Vec<UserSummary> = json_body(response).await;
    assert_eq!(users.len(), 2);

    let response = send(
        &app,
        request(Method::DELETE, "/api/users/victim@x.com", Some(&student), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let error: ApiErrorResponse = json_body(response).await;
    assert_eq!(error.code, "FORBIDDEN");

    let response = send(
        &app,
        request(
            Method::PUT,
            "/api/users",
            Some(&student),
            Some(json!({ "email": "victim@x.com", "name": "X", "dateOfBirth": "2000-01-01" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn teacher_updates_and_deletes_users() {
    let app = app();
    let teacher = token_for(&app, "t@x.com", "pw1", "Teacher").await;
    register(&app, "s@x.com", "old", "Student").await;

    let response = send(
        &app,
        request(
            Method::PUT,
            "/api/users",
            Some(&teacher),
            Some(json!({
                "email": "s@x.com",
                "name": "Renamed",
                "dateOfBirth": "2001-02-03",
                "password": "new"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request(Method::GET, "/api/users/s@x.com", Some(&teacher), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let user: UserSummary = json_body(response).await;
    assert_eq!(user.name, "Renamed");
    assert_eq!(user.designation, Role::Student);
    assert_eq!(login(&app, "s@x.com", "new").await.status(), StatusCode::OK);

    let response = send(&app, request(Method::DELETE, "/api/users/s@x.com", Some(&teacher), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request(Method::DELETE, "/api/users/s@x.com", Some(&teacher), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, request(Method::GET, "/api/users/s@x.com", Some(&teacher), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_missing_user_is_not_found() {
    let app = app();
    let teacher = token_for(&app, "t@x.com", "pw1", "Teacher").await;

    let response = send(
        &app,
        request(
            Method::PUT,
            "/api/users",
            Some(&teacher),
            Some(json!({ "email": "ghost@x.com", "name": "Ghost", "dateOfBirth": "1990-01-01" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_never_contain_password_hash() {
    let app = app();
    let teacher = token_for(&app, "t@x.com", "pw1", "Teacher").await;

    let response = send(&app, request(Method::GET, "/api/users", Some(&teacher), None)).await;
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("dateOfBirth"));
    assert!(!text.contains("argon2"));
    assert!(!text.to_lowercase().contains("password"));
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = app();
    let response = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request(Method::GET, "/health/ready", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
