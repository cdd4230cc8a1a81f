//! Repository for the `attendance` table.

use contrack_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::attendance::{
    Attendance, AttendanceWithProject, CreateAttendance, ProjectAttendanceSummary,
    UpdateAttendance,
};

const COLUMNS: &str = "id, worker_id, project_id, date, status, worker_name, nationality, \
    job_title, created_at, updated_at";

const WITH_PROJECT: &str =
    "SELECT a.*, p.name AS project_name, p.company_id, p.contractor_id
     FROM attendance a
     JOIN projects p ON p.id = a.project_id";

/// Provides CRUD operations and the per-project summary for attendance.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Record attendance, copying name, nationality and job title from the worker.
    ///
    /// Returns `None` if the worker does not exist.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttendance,
    ) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance
                (worker_id, project_id, date, status, worker_name, nationality, job_title)
             SELECT w.id, $2, $3, $4, w.name, w.nationality, w.job_title
             FROM workers w
             WHERE w.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(input.worker_id)
            .bind(input.project_id)
            .bind(input.date)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Find an attendance record with its project resolved.
    pub async fn find_with_project(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttendanceWithProject>, sqlx::Error> {
        let query = format!("{WITH_PROJECT} WHERE a.id = $1");
        sqlx::query_as::<_, AttendanceWithProject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List attendance, latest day first. Filters apply to the project.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
        project_id: Option<DbId>,
        date: Option<Date>,
    ) -> Result<Vec<AttendanceWithProject>, sqlx::Error> {
        let query = format!(
            "{WITH_PROJECT}
             WHERE ($1::BIGINT IS NULL OR p.company_id = $1)
               AND ($2::BIGINT IS NULL OR p.contractor_id = $2)
               AND ($3::BIGINT IS NULL OR a.project_id = $3)
               AND ($4::DATE IS NULL OR a.date = $4)
             ORDER BY a.date DESC, a.worker_name"
        );
        sqlx::query_as::<_, AttendanceWithProject>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .bind(project_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Correct the date or status of a record.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAttendance,
    ) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance SET
                date = COALESCE($2, date),
                status = COALESCE($3, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(id)
            .bind(input.date)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an attendance record by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Present and absent totals per project across all recorded days.
    pub async fn summary(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<ProjectAttendanceSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProjectAttendanceSummary>(
            "SELECT
                p.id AS project_id,
                p.name AS project_name,
                MAX(a.date) AS latest_date,
                COUNT(*) FILTER (WHERE a.status = 'Present') AS attendance_count,
                COUNT(*) FILTER (WHERE a.status = 'Absent') AS absence_count
             FROM attendance a
             JOIN projects p ON p.id = a.project_id
             WHERE ($1::BIGINT IS NULL OR p.company_id = $1)
               AND ($2::BIGINT IS NULL OR p.contractor_id = $2)
             GROUP BY p.id, p.name
             ORDER BY p.name",
        )
        .bind(company_id)
        .bind(contractor_id)
        .fetch_all(pool)
        .await
    }
}
