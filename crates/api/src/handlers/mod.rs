//! HTTP handlers, one module per resource.

pub mod attendance;
pub mod auth;
pub mod company;
pub mod contractor;
pub mod officer;
pub mod payment;
pub mod project;
pub mod worker;

use contrack_core::error::CoreError;
use contrack_core::roles::{Principal, Role, TenantScope};
use contrack_core::types::DbId;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};

/// Company filter for tables keyed only by company (companies, officers).
///
/// Contractors are confined to the company they work for.
pub(crate) fn company_filter(principal: &Principal, requested: Option<DbId>) -> Option<DbId> {
    match principal.scope() {
        TenantScope::All => requested,
        TenantScope::Company(id) => Some(id),
        // No real row has id 0.
        TenantScope::Contractor(_) => Some(principal.company_id.unwrap_or(0)),
        TenantScope::Nothing => Some(0),
    }
}

/// Officers read every tenant but only write project safety fields.
pub(crate) fn reject_officer(principal: &Principal, entity: &str) -> AppResult<()> {
    if principal.role == Role::Officer {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Officers may not modify {entity} records"
        ))));
    }
    Ok(())
}

/// Check the strength of a new login password and hash it.
pub(crate) fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password_strength(password)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// [`hash_new_password`] for optional password changes on update.
pub(crate) fn hash_password_change(password: Option<&str>) -> AppResult<Option<String>> {
    password.map(hash_new_password).transpose()
}
