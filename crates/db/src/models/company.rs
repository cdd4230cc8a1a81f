//! Company (company owner / "comown") model and DTOs.

use contrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub user_id: DbId,
    pub company_code: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a company owner (creates the login user as well).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub company_code: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
}

/// DTO for updating a company. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCompany {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub company_code: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// New login password; hashed by the handler before it reaches the repo.
    pub password: Option<String>,
}
