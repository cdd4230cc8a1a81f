//! Shared helpers for the API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use contrack_api::auth::jwt::JwtConfig;
use contrack_api::auth::password::hash_password;
use contrack_api::config::{LogFormat, ServerConfig};
use contrack_api::router::build_app_router;
use contrack_api::state::AppState;
use contrack_core::roles::ROLE_ADMIN;
use contrack_db::models::user::{CreateUser, User};
use contrack_db::repositories::UserRepo;

/// Password used for every account the tests create.
pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        cookie_secure: false,
        log_format: LogFormat::Text,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the production router (same middleware stack) over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional Bearer token and JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// GET with the token carried in the `access_token` cookie instead of a header.
pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` part of the response's `Set-Cookie` header.
pub fn cookie_pair(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response must set a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Insert a login user directly, bypassing the registration endpoints.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Log in through the API and return the access token.
pub async fn login(app: &Router, email: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {email} failed");
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create an admin account and log it in.
pub async fn admin_token(pool: &PgPool, app: &Router) -> String {
    create_user(pool, "admin@contrack.test", ROLE_ADMIN).await;
    login(app, "admin@contrack.test").await
}

// ---------------------------------------------------------------------------
// Fixtures created through the API
// ---------------------------------------------------------------------------

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("record must have an id")
}

/// Register a company owner; the login email is `<code>@owner.test`.
pub async fn create_company(app: &Router, token: &str, code: &str) -> Value {
    let body = json!({
        "company_code": code,
        "name": format!("Company {code}"),
        "email": format!("{code}@owner.test"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/companies", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Register a contractor; the login email is `<code>@contractor.test`.
pub async fn create_contractor(app: &Router, token: &str, code: &str, company_id: i64) -> Value {
    let body = json!({
        "contractor_code": code,
        "name": format!("Contractor {code}"),
        "email": format!("{code}@contractor.test"),
        "password": TEST_PASSWORD,
        "company_id": company_id,
    });
    let response = post_json(app, "/api/v1/contractors", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Register an officer; the login email is `<code>@officer.test`.
pub async fn create_officer(app: &Router, token: &str, code: &str) -> Value {
    let body = json!({
        "officer_code": code,
        "name": format!("Officer {code}"),
        "email": format!("{code}@officer.test"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/officers", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

pub fn project_body(number: &str, company_id: i64, contractor_id: i64) -> Value {
    json!({
        "name": format!("Project {number}"),
        "project_number": number,
        "start_date": "2026-01-01",
        "end_date": "2026-12-31",
        "location": "NGL",
        "assigned_location": "HVAC",
        "company_id": company_id,
        "contractor_id": contractor_id,
    })
}

pub async fn create_project(
    app: &Router,
    token: &str,
    number: &str,
    company_id: i64,
    contractor_id: i64,
) -> Value {
    let body = project_body(number, company_id, contractor_id);
    let response = post_json(app, "/api/v1/projects", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// A company, one of its contractors and one project, created by an admin.
pub struct Tenant {
    pub company_id: i64,
    pub contractor_id: i64,
    pub project_id: i64,
}

pub async fn seed_tenant(app: &Router, admin: &str, code: &str) -> Tenant {
    let company_id = id_of(&create_company(app, admin, code).await);
    let contractor_id = id_of(&create_contractor(app, admin, &format!("{code}-c"), company_id).await);
    let project_id = id_of(
        &create_project(app, admin, &format!("{code}-P1"), company_id, contractor_id).await,
    );
    Tenant {
        company_id,
        contractor_id,
        project_id,
    }
}

pub async fn post_payment(app: &Router, token: &str, project_id: i64, amount: f64) -> Response {
    let body = json!({
        "project_id": project_id,
        "amount": amount,
        "payment_date": "2026-03-01",
    });
    post_json(app, "/api/v1/payments", token, body).await
}
