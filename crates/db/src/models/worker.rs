//! Worker model, DTOs and per-contractor head counts.

use contrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "nationality")]
pub enum Nationality {
    Saudi,
    #[serde(rename = "Non-Saudi")]
    #[sqlx(rename = "Non-Saudi")]
    NonSaudi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_title")]
pub enum JobTitle {
    #[serde(rename = "WPR")]
    #[sqlx(rename = "WPR")]
    Wpr,
    Supervisor,
    #[serde(rename = "Safety Officer")]
    #[sqlx(rename = "Safety Officer")]
    SafetyOfficer,
    Helper,
    #[serde(rename = "HVAC")]
    #[sqlx(rename = "HVAC")]
    Hvac,
    Elect,
    #[serde(rename = "PCST")]
    #[sqlx(rename = "PCST")]
    Pcst,
    Welder,
    Fabricator,
    Metal,
    Machinist,
}

/// A row from the `workers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Worker {
    pub id: DbId,
    pub worker_number: String,
    pub name: String,
    pub nationality: Nationality,
    pub job_title: JobTitle,
    pub contractor_id: DbId,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A worker with the owning contractor's name and company resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkerWithContractor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub worker: Worker,
    pub contractor_name: String,
    pub company_id: Option<DbId>,
}

/// DTO for creating a worker.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorker {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub worker_number: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub nationality: Nationality,
    pub job_title: JobTitle,
    /// Forced to the caller's contractor id for contractors.
    pub contractor_id: Option<DbId>,
    pub project_id: Option<DbId>,
}

/// DTO for updating a worker. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorker {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub worker_number: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    pub nationality: Option<Nationality>,
    pub job_title: Option<JobTitle>,
    pub project_id: Option<DbId>,
}

/// Head counts for one contractor, split by nationality and job title.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractorWorkerCounts {
    pub contractor_id: DbId,
    pub contractor_name: String,
    pub company_id: Option<DbId>,
    pub total_workers: i64,
    pub saudi_workers: i64,
    pub non_saudi_workers: i64,
    pub wpr_workers: i64,
    pub supervisor_workers: i64,
    pub safety_officer_workers: i64,
    pub helper_workers: i64,
    pub hvac_workers: i64,
    pub elect_workers: i64,
    pub pcst_workers: i64,
    pub welder_workers: i64,
    pub fabricator_workers: i64,
    pub metal_workers: i64,
    pub machinist_workers: i64,
}
