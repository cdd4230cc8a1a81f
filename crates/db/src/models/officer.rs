//! Safety officer model and DTOs.

use contrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `officers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Officer {
    pub id: DbId,
    pub user_id: DbId,
    pub company_id: Option<DbId>,
    pub officer_code: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering an officer (creates the login user as well).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOfficer {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub officer_code: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub company_id: Option<DbId>,
}

/// DTO for updating an officer. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOfficer {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub officer_code: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub company_id: Option<DbId>,
}
