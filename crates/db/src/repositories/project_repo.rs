//! Repository for the `projects` table and its per-contractor reports.

use contrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    ContractorProjectCount, ContractorSafetyReport, CreateProject, Project, ProjectRoleFields,
    ProjectWithNames, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, project_number, start_date, end_date, status, location, \
    assigned_location, company_id, contractor_id, notes, \
    safety_type, occurred_on, incident_description, incident_status, \
    ytd_fai, of_fai_not_completed, ytd_observation, of_observation_not_completed, \
    ytd_incident, of_incident_not_completed, total_not_closed, \
    scheduled_start, scheduled_end, schedule_remarks, will_work_next_week, \
    created_at, updated_at";

/// Joins that expand contractor and company names onto `p`.
const WITH_NAMES: &str = "SELECT p.*, c.name AS contractor_name, co.name AS company_name
     FROM projects p
     JOIN contractors c ON c.id = p.contractor_id
     JOIN companies co ON co.id = p.company_id";

/// Tenant filter over `p`; `$1` is the company id and `$2` the contractor id.
const TENANT_FILTER: &str = "($1::BIGINT IS NULL OR p.company_id = $1) \
     AND ($2::BIGINT IS NULL OR p.contractor_id = $2)";

/// Provides CRUD operations and reports for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `company_id` and assigned to `contractor_id`.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        contractor_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let (safety, schedule) = ProjectRoleFields::split(input.role_fields.as_ref());
        let query = format!(
            "INSERT INTO projects
                (name, project_number, start_date, end_date, status, location,
                 assigned_location, company_id, contractor_id, notes,
                 safety_type, occurred_on, incident_description, incident_status,
                 ytd_fai, of_fai_not_completed, ytd_observation, of_observation_not_completed,
                 ytd_incident, of_incident_not_completed, total_not_closed,
                 scheduled_start, scheduled_end, schedule_remarks, will_work_next_week)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'Active'::project_status), $6, $7, $8, $9, $10,
                     $11, $12, $13, $14,
                     COALESCE($15, 0), COALESCE($16, 0), COALESCE($17, 0), COALESCE($18, 0),
                     COALESCE($19, 0), COALESCE($20, 0), COALESCE($21, 0),
                     $22, $23, $24, COALESCE($25, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.project_number)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status)
            .bind(input.location)
            .bind(input.assigned_location)
            .bind(company_id)
            .bind(contractor_id)
            .bind(&input.notes)
            .bind(safety.safety_type)
            .bind(safety.occurred_on)
            .bind(&safety.incident_description)
            .bind(safety.incident_status)
            .bind(safety.ytd_fai)
            .bind(safety.of_fai_not_completed)
            .bind(safety.ytd_observation)
            .bind(safety.of_observation_not_completed)
            .bind(safety.ytd_incident)
            .bind(safety.of_incident_not_completed)
            .bind(safety.total_not_closed)
            .bind(schedule.scheduled_start)
            .bind(schedule.scheduled_end)
            .bind(&schedule.schedule_remarks)
            .bind(schedule.will_work_next_week)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID with contractor and company names resolved.
    pub async fn find_with_names(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithNames>, sqlx::Error> {
        let query = format!("{WITH_NAMES} WHERE p.id = $1");
        sqlx::query_as::<_, ProjectWithNames>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a project row for the rest of the transaction.
    ///
    /// Every payment write for the project serializes on this lock.
    pub async fn lock_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// List projects, newest first. `None` filters match everything.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<ProjectWithNames>, sqlx::Error> {
        let query = format!("{WITH_NAMES} WHERE {TENANT_FILTER} ORDER BY p.created_at DESC, p.id DESC");
        sqlx::query_as::<_, ProjectWithNames>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }

    /// Projects that carry any contractor schedule, earliest scheduled start first.
    pub async fn list_scheduled(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<ProjectWithNames>, sqlx::Error> {
        let query = format!(
            "{WITH_NAMES}
             WHERE {TENANT_FILTER}
               AND (p.scheduled_start IS NOT NULL OR p.scheduled_end IS NOT NULL)
             ORDER BY p.scheduled_start NULLS LAST, p.id"
        );
        sqlx::query_as::<_, ProjectWithNames>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied,
    /// including those inside `role_fields`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let (safety, schedule) = ProjectRoleFields::split(input.role_fields.as_ref());
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                project_number = COALESCE($3, project_number),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                status = COALESCE($6, status),
                location = COALESCE($7, location),
                assigned_location = COALESCE($8, assigned_location),
                contractor_id = COALESCE($9, contractor_id),
                notes = COALESCE($10, notes),
                safety_type = COALESCE($11, safety_type),
                occurred_on = COALESCE($12, occurred_on),
                incident_description = COALESCE($13, incident_description),
                incident_status = COALESCE($14, incident_status),
                ytd_fai = COALESCE($15, ytd_fai),
                of_fai_not_completed = COALESCE($16, of_fai_not_completed),
                ytd_observation = COALESCE($17, ytd_observation),
                of_observation_not_completed = COALESCE($18, of_observation_not_completed),
                ytd_incident = COALESCE($19, ytd_incident),
                of_incident_not_completed = COALESCE($20, of_incident_not_completed),
                total_not_closed = COALESCE($21, total_not_closed),
                scheduled_start = COALESCE($22, scheduled_start),
                scheduled_end = COALESCE($23, scheduled_end),
                schedule_remarks = COALESCE($24, schedule_remarks),
                will_work_next_week = COALESCE($25, will_work_next_week)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.project_number)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status)
            .bind(input.location)
            .bind(input.assigned_location)
            .bind(input.contractor_id)
            .bind(&input.notes)
            .bind(safety.safety_type)
            .bind(safety.occurred_on)
            .bind(&safety.incident_description)
            .bind(safety.incident_status)
            .bind(safety.ytd_fai)
            .bind(safety.of_fai_not_completed)
            .bind(safety.ytd_observation)
            .bind(safety.of_observation_not_completed)
            .bind(safety.ytd_incident)
            .bind(safety.of_incident_not_completed)
            .bind(safety.total_not_closed)
            .bind(schedule.scheduled_start)
            .bind(schedule.scheduled_end)
            .bind(&schedule.schedule_remarks)
            .bind(schedule.will_work_next_week)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project by ID. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while payments, workers or
    /// attendance still reference the project.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Project counts per contractor, split by status.
    pub async fn counts_by_contractor(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<ContractorProjectCount>, sqlx::Error> {
        let query = format!(
            "SELECT
                c.id AS contractor_id,
                c.name AS contractor_name,
                COUNT(p.id) AS total_projects,
                COUNT(p.id) FILTER (WHERE p.status = 'Active') AS active_projects,
                COUNT(p.id) FILTER (WHERE p.status = 'Completed') AS completed_projects,
                COUNT(p.id) FILTER (WHERE p.status = 'Expired') AS expired_projects
             FROM projects p
             JOIN contractors c ON c.id = p.contractor_id
             WHERE {TENANT_FILTER}
             GROUP BY c.id, c.name
             ORDER BY c.name"
        );
        sqlx::query_as::<_, ContractorProjectCount>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }

    /// Safety counters summed over every project of each contractor.
    pub async fn safety_report(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<ContractorSafetyReport>, sqlx::Error> {
        let query = format!(
            "SELECT
                c.id AS contractor_id,
                c.name AS contractor_name,
                COUNT(p.id) AS project_count,
                SUM(p.ytd_fai)::BIGINT AS ytd_fai,
                SUM(p.of_fai_not_completed)::BIGINT AS of_fai_not_completed,
                SUM(p.ytd_observation)::BIGINT AS ytd_observation,
                SUM(p.of_observation_not_completed)::BIGINT AS of_observation_not_completed,
                SUM(p.ytd_incident)::BIGINT AS ytd_incident,
                SUM(p.of_incident_not_completed)::BIGINT AS of_incident_not_completed,
                SUM(p.total_not_closed)::BIGINT AS total_not_closed
             FROM projects p
             JOIN contractors c ON c.id = p.contractor_id
             WHERE {TENANT_FILTER}
             GROUP BY c.id, c.name
             ORDER BY c.name"
        );
        sqlx::query_as::<_, ContractorSafetyReport>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }
}
