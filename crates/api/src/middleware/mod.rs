//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the calling [`Principal`](contrack_core::roles::Principal)
//!   from the `access_token` cookie or a Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireManager`] -- Requires `admin` or `company_owner`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
