//! Contractor model and DTOs.

use contrack_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contractors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contractor {
    pub id: DbId,
    pub user_id: DbId,
    pub company_id: Option<DbId>,
    pub contractor_code: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub certificate_start: Option<Date>,
    pub certificate_expiry: Option<Date>,
    pub prequal_expiry: Option<Date>,
    /// Share of the workforce holding local national status, in percent.
    pub saudization_pct: f64,
    /// Local-content (Iktva) figure, in percent.
    pub iktva_pct: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a contractor (creates the login user as well).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContractor {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub contractor_code: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    /// Forced to the caller's company for company owners.
    pub company_id: Option<DbId>,
    pub certificate_start: Option<Date>,
    pub certificate_expiry: Option<Date>,
    pub prequal_expiry: Option<Date>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub saudization_pct: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub iktva_pct: Option<f64>,
}

/// DTO for updating a contractor. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateContractor {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub contractor_code: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub company_id: Option<DbId>,
    pub certificate_start: Option<Date>,
    pub certificate_expiry: Option<Date>,
    pub prequal_expiry: Option<Date>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub saudization_pct: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub iktva_pct: Option<f64>,
}

/// A contractor whose certificate or pre-qualification lapses soon.
#[derive(Debug, Clone, Serialize)]
pub struct ExpiringContractor {
    #[serde(flatten)]
    pub contractor: Contractor,
    pub certificate_expiring: bool,
    pub prequal_expiring: bool,
}
