//! Payment model and DTOs.
//!
//! `amount` is a percentage of the project value; see
//! `contrack_core::payment` for the cumulative ceiling.

use contrack_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Approval state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    Paid,
    Submitted,
    #[serde(rename = "Under-approval")]
    #[sqlx(rename = "Under-approval")]
    UnderApproval,
    Rejected,
}

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub project_id: DbId,
    pub contractor_id: DbId,
    pub company_id: Option<DbId>,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_date: Date,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A payment with its project and contractor names resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,
    pub project_name: String,
    pub contractor_name: String,
}

/// DTO for recording a payment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePayment {
    pub project_id: DbId,
    /// Forced to the caller's contractor id for contractors.
    pub contractor_id: Option<DbId>,
    /// Paying company. Must match the project's company when given.
    pub company_id: Option<DbId>,
    pub amount: f64,
    /// Defaults to `Submitted` if omitted.
    pub status: Option<PaymentStatus>,
    pub payment_date: Date,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub remarks: Option<String>,
}

/// DTO for updating a payment. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePayment {
    pub amount: Option<f64>,
    pub status: Option<PaymentStatus>,
    pub payment_date: Option<Date>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub remarks: Option<String>,
}

/// Cumulative payment position of a project.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentHeadroom {
    pub project_id: DbId,
    pub existing_sum: f64,
    pub headroom: f64,
    pub payment_count: usize,
}
