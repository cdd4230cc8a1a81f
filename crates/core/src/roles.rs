//! Roles, the authenticated principal, and tenant scoping.
//!
//! Role names must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_COMPANY_OWNER: &str = "company_owner";
pub const ROLE_CONTRACTOR: &str = "contractor";
pub const ROLE_OFFICER: &str = "officer";

/// The four account kinds that can sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    CompanyOwner,
    Contractor,
    Officer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::CompanyOwner => ROLE_COMPANY_OWNER,
            Role::Contractor => ROLE_CONTRACTOR,
            Role::Officer => ROLE_OFFICER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_COMPANY_OWNER => Ok(Role::CompanyOwner),
            ROLE_CONTRACTOR => Ok(Role::Contractor),
            ROLE_OFFICER => Ok(Role::Officer),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// The caller of a request, resolved from its access token and profile rows.
///
/// Handlers receive this explicitly; there is no ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: DbId,
    pub role: Role,
    /// Company the caller owns (company owners) or belongs to.
    pub company_id: Option<DbId>,
    /// Set when the caller is a contractor.
    pub contractor_id: Option<DbId>,
    /// Set when the caller is a safety officer.
    pub officer_id: Option<DbId>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Which rows this principal may read.
    ///
    /// Admins and officers see everything. Company owners are confined to
    /// their company and contractors to their own records.
    pub fn scope(&self) -> TenantScope {
        match self.role {
            Role::Admin | Role::Officer => TenantScope::All,
            Role::CompanyOwner => match self.company_id {
                Some(id) => TenantScope::Company(id),
                None => TenantScope::Nothing,
            },
            Role::Contractor => match self.contractor_id {
                Some(id) => TenantScope::Contractor(id),
                None => TenantScope::Nothing,
            },
        }
    }
}

/// Row-level visibility derived from a [`Principal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    All,
    Company(DbId),
    Contractor(DbId),
    /// A profile row is missing; nothing is visible.
    Nothing,
}

impl TenantScope {
    /// Filter values for repository queries: `(company_id, contractor_id)`.
    ///
    /// An explicit caller-supplied company filter is honoured only when it
    /// does not widen the scope.
    pub fn filters(&self, requested_company: Option<DbId>) -> (Option<DbId>, Option<DbId>) {
        match *self {
            TenantScope::All => (requested_company, None),
            TenantScope::Company(id) => (Some(id), None),
            TenantScope::Contractor(id) => (requested_company, Some(id)),
            // No real row has id 0.
            TenantScope::Nothing => (Some(0), Some(0)),
        }
    }

    /// Whether a row owned by `company_id` / `contractor_id` is visible.
    pub fn permits(&self, company_id: Option<DbId>, contractor_id: Option<DbId>) -> bool {
        match *self {
            TenantScope::All => true,
            TenantScope::Company(id) => company_id == Some(id),
            TenantScope::Contractor(id) => contractor_id == Some(id),
            TenantScope::Nothing => false,
        }
    }

    /// Like [`permits`](Self::permits) but as a `Forbidden` error.
    pub fn ensure(
        &self,
        entity: &'static str,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<(), CoreError> {
        if self.permits(company_id, contractor_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "{entity} belongs to another tenant"
            )))
        }
    }
}

/// The role-conditional field groups on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFieldKind {
    /// Incident fields and year-to-date counters, written by safety officers.
    Safety,
    /// Contractor schedule (window, remarks, next-week flag).
    Schedule,
}

impl RoleFieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleFieldKind::Safety => "safety",
            RoleFieldKind::Schedule => "schedule",
        }
    }
}

/// Reject a role-field group the caller's role may not write.
pub fn ensure_can_write(role: Role, kind: RoleFieldKind) -> Result<(), CoreError> {
    let allowed = match kind {
        RoleFieldKind::Safety => matches!(role, Role::Admin | Role::Officer),
        RoleFieldKind::Schedule => matches!(role, Role::Admin | Role::Contractor),
    };
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' may not write {} fields",
            kind.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn principal(role: Role, company_id: Option<DbId>, contractor_id: Option<DbId>) -> Principal {
        Principal {
            user_id: 1,
            role,
            company_id,
            contractor_id,
            officer_id: None,
        }
    }

    #[test]
    fn role_round_trips_through_its_name() {
        for role in [Role::Admin, Role::CompanyOwner, Role::Contractor, Role::Officer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn company_owner_is_pinned_to_own_company() {
        let p = principal(Role::CompanyOwner, Some(7), None);
        assert_eq!(p.scope(), TenantScope::Company(7));
        // Asking for another company does not widen the scope.
        assert_eq!(p.scope().filters(Some(9)), (Some(7), None));
        assert!(p.scope().permits(Some(7), Some(3)));
        assert!(!p.scope().permits(Some(8), Some(3)));
    }

    #[test]
    fn contractor_sees_only_own_rows() {
        let p = principal(Role::Contractor, None, Some(4));
        assert_eq!(p.scope().filters(None), (None, Some(4)));
        assert!(p.scope().permits(Some(1), Some(4)));
        assert!(!p.scope().permits(Some(1), Some(5)));
    }

    #[test]
    fn admin_and_officer_see_everything() {
        assert_eq!(principal(Role::Admin, None, None).scope(), TenantScope::All);
        assert_eq!(principal(Role::Officer, Some(2), None).scope(), TenantScope::All);
        assert_eq!(TenantScope::All.filters(Some(3)), (Some(3), None));
    }

    #[test]
    fn missing_profile_sees_nothing() {
        let p = principal(Role::Contractor, None, None);
        assert_eq!(p.scope(), TenantScope::Nothing);
        assert!(!p.scope().permits(None, None));
        assert_matches!(
            p.scope().ensure("Project", Some(1), Some(1)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn role_field_permissions() {
        assert!(ensure_can_write(Role::Officer, RoleFieldKind::Safety).is_ok());
        assert!(ensure_can_write(Role::Contractor, RoleFieldKind::Schedule).is_ok());
        assert!(ensure_can_write(Role::Admin, RoleFieldKind::Safety).is_ok());
        assert!(ensure_can_write(Role::Admin, RoleFieldKind::Schedule).is_ok());

        assert_matches!(
            ensure_can_write(Role::Contractor, RoleFieldKind::Safety),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            ensure_can_write(Role::Officer, RoleFieldKind::Schedule),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            ensure_can_write(Role::CompanyOwner, RoleFieldKind::Schedule),
            Err(CoreError::Forbidden(_))
        );
    }
}
