//! Principal extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use contrack_core::error::CoreError;
use contrack_core::roles::{Principal, Role};
use contrack_db::repositories::UserRepo;

use crate::auth::cookie::token_from_cookies;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved per request.
///
/// The token is read from the `Authorization: Bearer` header first and the
/// `access_token` cookie second. Profile ids are looked up on every request,
/// so a deleted or deactivated account loses access immediately.
///
/// ```ignore
/// async fn my_handler(AuthUser(principal): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = principal.user_id, role = %principal.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .or_else(|| token_from_cookies(&parts.headers))
            .ok_or_else(|| unauthorized("Missing access token"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let role: Role = claims
            .role
            .parse()
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| unauthorized("Account no longer active"))?;

        let profile = UserRepo::profile_ids(&state.pool, user.id).await?;

        Ok(AuthUser(Principal {
            user_id: user.id,
            role,
            company_id: profile.company_id,
            contractor_id: profile.contractor_id,
            officer_id: profile.officer_id,
        }))
    }
}

/// A present but malformed `Authorization` header is rejected rather than
/// falling through to the cookie.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;
    value.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        unauthorized("Invalid Authorization format. Expected: Bearer <token>")
    })
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}
