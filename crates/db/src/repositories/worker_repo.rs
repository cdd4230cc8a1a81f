//! Repository for the `workers` table.

use contrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::worker::{
    ContractorWorkerCounts, CreateWorker, UpdateWorker, Worker, WorkerWithContractor,
};

const COLUMNS: &str = "id, worker_number, name, nationality, job_title, contractor_id, \
    project_id, created_at, updated_at";

const WITH_CONTRACTOR: &str = "SELECT w.*, c.name AS contractor_name, c.company_id
     FROM workers w
     JOIN contractors c ON c.id = w.contractor_id";

/// Provides CRUD operations and head counts for workers.
pub struct WorkerRepo;

impl WorkerRepo {
    /// Insert a new worker employed by `contractor_id`.
    pub async fn create(
        pool: &PgPool,
        contractor_id: DbId,
        input: &CreateWorker,
    ) -> Result<Worker, sqlx::Error> {
        let query = format!(
            "INSERT INTO workers (worker_number, name, nationality, job_title, contractor_id, project_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(&input.worker_number)
            .bind(&input.name)
            .bind(input.nationality)
            .bind(input.job_title)
            .bind(contractor_id)
            .bind(input.project_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workers WHERE id = $1");
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a worker with the employing contractor resolved.
    pub async fn find_with_contractor(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkerWithContractor>, sqlx::Error> {
        let query = format!("{WITH_CONTRACTOR} WHERE w.id = $1");
        sqlx::query_as::<_, WorkerWithContractor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List workers by name. The company filter applies to the contractor's company.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
        project_id: Option<DbId>,
    ) -> Result<Vec<WorkerWithContractor>, sqlx::Error> {
        let query = format!(
            "{WITH_CONTRACTOR}
             WHERE ($1::BIGINT IS NULL OR c.company_id = $1)
               AND ($2::BIGINT IS NULL OR w.contractor_id = $2)
               AND ($3::BIGINT IS NULL OR w.project_id = $3)
             ORDER BY w.name, w.id"
        );
        sqlx::query_as::<_, WorkerWithContractor>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a worker. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorker,
    ) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!(
            "UPDATE workers SET
                worker_number = COALESCE($2, worker_number),
                name = COALESCE($3, name),
                nationality = COALESCE($4, nationality),
                job_title = COALESCE($5, job_title),
                project_id = COALESCE($6, project_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .bind(&input.worker_number)
            .bind(&input.name)
            .bind(input.nationality)
            .bind(input.job_title)
            .bind(input.project_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a worker by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Head counts per contractor by nationality and job title.
    ///
    /// Contractors without workers are included with zero counts.
    pub async fn counts_by_contractor(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<ContractorWorkerCounts>, sqlx::Error> {
        sqlx::query_as::<_, ContractorWorkerCounts>(
            "SELECT
                c.id AS contractor_id,
                c.name AS contractor_name,
                c.company_id,
                COUNT(w.id) AS total_workers,
                COUNT(w.id) FILTER (WHERE w.nationality = 'Saudi') AS saudi_workers,
                COUNT(w.id) FILTER (WHERE w.nationality = 'Non-Saudi') AS non_saudi_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'WPR') AS wpr_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Supervisor') AS supervisor_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Safety Officer') AS safety_officer_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Helper') AS helper_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'HVAC') AS hvac_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Elect') AS elect_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'PCST') AS pcst_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Welder') AS welder_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Fabricator') AS fabricator_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Metal') AS metal_workers,
                COUNT(w.id) FILTER (WHERE w.job_title = 'Machinist') AS machinist_workers
             FROM contractors c
             LEFT JOIN workers w ON w.contractor_id = c.id
             WHERE ($1::BIGINT IS NULL OR c.company_id = $1)
               AND ($2::BIGINT IS NULL OR c.id = $2)
             GROUP BY c.id, c.name, c.company_id
             ORDER BY c.name",
        )
        .bind(company_id)
        .bind(contractor_id)
        .fetch_all(pool)
        .await
    }
}
