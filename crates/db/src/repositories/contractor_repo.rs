//! Repository for the `contractors` table.

use contrack_core::roles::ROLE_CONTRACTOR;
use contrack_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::contractor::{Contractor, CreateContractor, UpdateContractor};
use crate::models::user::CreateUser;
use crate::repositories::UserRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, company_id, contractor_code, name, email, phone_number, \
    certificate_start, certificate_expiry, prequal_expiry, saudization_pct, iktva_pct, \
    created_at, updated_at";

/// Provides CRUD operations for contractors and their login accounts.
pub struct ContractorRepo;

impl ContractorRepo {
    /// Create the contractor's login user and profile row in one transaction.
    ///
    /// Missing percentage figures default to 0.
    pub async fn register(
        pool: &PgPool,
        input: &CreateContractor,
        password_hash: &str,
    ) -> Result<Contractor, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = UserRepo::create_in_tx(
            &mut tx,
            &CreateUser {
                email: input.email.clone(),
                password_hash: password_hash.to_string(),
                role: ROLE_CONTRACTOR.to_string(),
            },
        )
        .await?;

        let query = format!(
            "INSERT INTO contractors
                (user_id, company_id, contractor_code, name, email, phone_number,
                 certificate_start, certificate_expiry, prequal_expiry,
                 saudization_pct, iktva_pct)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 0), COALESCE($11, 0))
             RETURNING {COLUMNS}"
        );
        let contractor = sqlx::query_as::<_, Contractor>(&query)
            .bind(user.id)
            .bind(input.company_id)
            .bind(&input.contractor_code)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(input.certificate_start)
            .bind(input.certificate_expiry)
            .bind(input.prequal_expiry)
            .bind(input.saudization_pct)
            .bind(input.iktva_pct)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(contractor)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contractor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contractors WHERE id = $1");
        sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contractors by name. `None` filters match everything.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<Contractor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contractors
             WHERE ($1::BIGINT IS NULL OR company_id = $1)
               AND ($2::BIGINT IS NULL OR id = $2)
             ORDER BY name"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(company_id)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }

    /// Contractors whose certificate or pre-qualification expires on or
    /// before `horizon`, soonest first.
    pub async fn list_expiring(
        pool: &PgPool,
        horizon: Date,
        company_id: Option<DbId>,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<Contractor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contractors
             WHERE (certificate_expiry <= $1 OR prequal_expiry <= $1)
               AND ($2::BIGINT IS NULL OR company_id = $2)
               AND ($3::BIGINT IS NULL OR id = $3)
             ORDER BY LEAST(certificate_expiry, prequal_expiry), name"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(horizon)
            .bind(company_id)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }

    /// Update a contractor and, when email or password change, its login user.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContractor,
        password_hash: Option<&str>,
    ) -> Result<Option<Contractor>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE contractors SET
                contractor_code = COALESCE($2, contractor_code),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number),
                company_id = COALESCE($6, company_id),
                certificate_start = COALESCE($7, certificate_start),
                certificate_expiry = COALESCE($8, certificate_expiry),
                prequal_expiry = COALESCE($9, prequal_expiry),
                saudization_pct = COALESCE($10, saudization_pct),
                iktva_pct = COALESCE($11, iktva_pct)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let contractor = sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .bind(&input.contractor_code)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(input.company_id)
            .bind(input.certificate_start)
            .bind(input.certificate_expiry)
            .bind(input.prequal_expiry)
            .bind(input.saudization_pct)
            .bind(input.iktva_pct)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(contractor) = contractor else {
            return Ok(None);
        };

        if input.email.is_some() || password_hash.is_some() {
            UserRepo::update_credentials_in_tx(
                &mut tx,
                contractor.user_id,
                input.email.as_deref(),
                password_hash,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(Some(contractor))
    }

    /// Delete a contractor and its login account. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while projects, payments or workers
    /// still reference the contractor.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id: Option<DbId> =
            sqlx::query_scalar("DELETE FROM contractors WHERE id = $1 RETURNING user_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(user_id) = user_id else {
            return Ok(false);
        };
        UserRepo::delete_in_tx(&mut tx, user_id).await?;

        tx.commit().await?;
        Ok(true)
    }
}
