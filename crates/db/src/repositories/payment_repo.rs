//! Repository for the `payments` table.
//!
//! Writes that change a project's cumulative percentage go through the
//! `*_in_tx` methods so the caller can hold the project row lock
//! ([`ProjectRepo::lock_for_update`](crate::repositories::ProjectRepo::lock_for_update))
//! across the read-sum-write sequence.

use contrack_core::payment::quantize;
use contrack_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::payment::{CreatePayment, Payment, PaymentWithNames, UpdatePayment};

/// Column list shared across queries to avoid repetition. `amount` is stored
/// as `NUMERIC(5,2)` and read back as `f64`.
const COLUMNS: &str = "id, project_id, contractor_id, company_id, \
    amount::DOUBLE PRECISION AS amount, status, payment_date, remarks, created_at, updated_at";

const WITH_NAMES: &str = "SELECT pay.id, pay.project_id, pay.contractor_id, pay.company_id,
        pay.amount::DOUBLE PRECISION AS amount, pay.status, pay.payment_date, pay.remarks,
        pay.created_at, pay.updated_at,
        p.name AS project_name, c.name AS contractor_name
     FROM payments pay
     JOIN projects p ON p.id = pay.project_id
     JOIN contractors c ON c.id = pay.contractor_id";

/// Provides CRUD operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Amounts of every payment recorded against a project, oldest first.
    ///
    /// `exclude` drops one payment from the result, used when re-checking
    /// the ceiling for an update to that payment.
    pub async fn amounts_for_project<'e, E>(
        executor: E,
        project_id: DbId,
        exclude: Option<DbId>,
    ) -> Result<Vec<f64>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT amount::DOUBLE PRECISION FROM payments
             WHERE project_id = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             ORDER BY id",
        )
        .bind(project_id)
        .bind(exclude)
        .fetch_all(executor)
        .await
    }

    /// Insert a payment inside the caller's transaction.
    ///
    /// The ceiling check is the caller's job; this only writes the row. The
    /// amount is stored quantized to basis points, the precision the ceiling
    /// check works in.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        contractor_id: DbId,
        company_id: Option<DbId>,
        input: &CreatePayment,
    ) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments
                (project_id, contractor_id, company_id, amount, status, payment_date, remarks)
             VALUES ($1, $2, $3, $4::NUMERIC(5, 2), COALESCE($5, 'Submitted'::payment_status), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.project_id)
            .bind(contractor_id)
            .bind(company_id)
            .bind(quantize(input.amount))
            .bind(input.status)
            .bind(input.payment_date)
            .bind(&input.remarks)
            .fetch_one(&mut **tx)
            .await
    }

    /// Update a payment inside the caller's transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        input: &UpdatePayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET
                amount = COALESCE($2::NUMERIC(5, 2), amount),
                status = COALESCE($3, status),
                payment_date = COALESCE($4, payment_date),
                remarks = COALESCE($5, remarks)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(input.amount.map(quantize))
            .bind(input.status)
            .bind(input.payment_date)
            .bind(&input.remarks)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a payment by ID with project and contractor names resolved.
    pub async fn find_with_names(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PaymentWithNames>, sqlx::Error> {
        let query = format!("{WITH_NAMES} WHERE pay.id = $1");
        sqlx::query_as::<_, PaymentWithNames>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List payments, most recent payment date first.
    ///
    /// The company filter applies to the owning project's company.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
        project_id: Option<DbId>,
    ) -> Result<Vec<PaymentWithNames>, sqlx::Error> {
        let query = format!(
            "{WITH_NAMES}
             WHERE ($1::BIGINT IS NULL OR p.company_id = $1)
               AND ($2::BIGINT IS NULL OR pay.contractor_id = $2)
               AND ($3::BIGINT IS NULL OR pay.project_id = $3)
             ORDER BY pay.payment_date DESC, pay.id DESC"
        );
        sqlx::query_as::<_, PaymentWithNames>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a payment by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
