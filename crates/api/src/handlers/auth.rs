//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::Json;
use chrono::Utc;
use contrack_core::error::CoreError;
use contrack_core::roles::Principal;
use contrack_db::models::user::UserResponse;
use contrack_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{clear_cookie, session_cookie};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response. The same token is also set as a cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub principal: Principal,
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token in the body
/// and in the HTTP-only `access_token` cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<(HeaderMap, Json<LoginResponse>)> {
    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        UserRepo::increment_failed_login(&state.pool, user.id).await?;

        let new_count = user.failed_login_count + 1;
        if new_count >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, %lock_until, "Account locked after failed logins");
        } else {
            tracing::warn!(user_id = user.id, attempts = new_count, "Failed login");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let expires_in = state.config.jwt.expires_in_secs();

    let cookie = session_cookie(&access_token, expires_in, state.config.cookie_secure);
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::InternalError(format!("Invalid cookie value: {e}")))?,
    );

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok((
        headers,
        Json(LoginResponse {
            access_token,
            expires_in,
            user: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Clears the access-token cookie. Returns 204 No Content. Tokens are
/// stateless, so a copied Bearer token stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> (StatusCode, [(HeaderName, String); 1]) {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_cookie(state.config.cookie_secure))],
    )
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<Json<MeResponse>> {
    let user = UserRepo::find_by_id(&state.pool, principal.user_id)
        .await?
        .ok_or(AppError::not_found("User", principal.user_id))?;

    Ok(Json(MeResponse {
        user: UserResponse::from(&user),
        principal,
    }))
}
