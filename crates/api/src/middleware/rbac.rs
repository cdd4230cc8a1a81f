//! Role-gated extractors.
//!
//! These only check the caller's role. Which rows the caller may touch is
//! decided in the handlers through [`Principal::scope`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use contrack_core::error::CoreError;
use contrack_core::roles::{Principal, Role};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn principal_with_role(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[Role],
    requirement: &str,
) -> Result<Principal, AppError> {
    let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&principal.role) {
        tracing::debug!(
            user_id = principal.user_id,
            role = %principal.role,
            requirement,
            "Role check failed",
        );
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{requirement} role required"
        ))));
    }
    Ok(principal)
}

/// Platform administrators only: company registration and removal.
///
/// ```ignore
/// async fn create(RequireAdmin(principal): RequireAdmin) -> AppResult<Json<Company>> { .. }
/// ```
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        principal_with_role(parts, state, &[Role::Admin], "Admin")
            .await
            .map(RequireAdmin)
    }
}

/// Admins and company owners: contractor and officer management.
pub struct RequireManager(pub Principal);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        principal_with_role(
            parts,
            state,
            &[Role::Admin, Role::CompanyOwner],
            "Company owner or Admin",
        )
        .await
        .map(RequireManager)
    }
}

/// Any signed-in account. Same as [`AuthUser`], named for route signatures.
pub struct RequireAuth(pub Principal);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(principal))
    }
}
