//! Daily attendance model, DTOs and per-project summary rows.

use contrack_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::worker::{JobTitle, Nationality};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// A row from the `attendance` table.
///
/// `worker_name`, `nationality` and `job_title` are copied from the worker
/// when the record is created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attendance {
    pub id: DbId,
    pub worker_id: DbId,
    pub project_id: DbId,
    pub date: Date,
    pub status: AttendanceStatus,
    pub worker_name: String,
    pub nationality: Nationality,
    pub job_title: JobTitle,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An attendance record with its project resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceWithProject {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attendance: Attendance,
    pub project_name: String,
    pub company_id: DbId,
    pub contractor_id: DbId,
}

/// DTO for recording attendance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttendance {
    pub worker_id: DbId,
    pub project_id: DbId,
    pub date: Date,
    pub status: AttendanceStatus,
}

/// DTO for correcting an attendance record. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAttendance {
    pub date: Option<Date>,
    pub status: Option<AttendanceStatus>,
}

/// Present/absent totals for one project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAttendanceSummary {
    pub project_id: DbId,
    pub project_name: String,
    /// Most recent day with any record.
    pub latest_date: Date,
    pub attendance_count: i64,
    pub absence_count: i64,
}
