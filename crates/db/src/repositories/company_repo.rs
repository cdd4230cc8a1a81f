//! Repository for the `companies` table.

use contrack_core::roles::ROLE_COMPANY_OWNER;
use contrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany, UpdateCompany};
use crate::models::user::CreateUser;
use crate::repositories::UserRepo;

const COLUMNS: &str = "id, user_id, company_code, name, email, phone_number, created_at, updated_at";

/// Provides CRUD operations for companies and their owner accounts.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Create the owner's login user and the company row in one transaction.
    pub async fn register(
        pool: &PgPool,
        input: &CreateCompany,
        password_hash: &str,
    ) -> Result<Company, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = UserRepo::create_in_tx(
            &mut tx,
            &CreateUser {
                email: input.email.clone(),
                password_hash: password_hash.to_string(),
                role: ROLE_COMPANY_OWNER.to_string(),
            },
        )
        .await?;

        let query = format!(
            "INSERT INTO companies (user_id, company_code, name, email, phone_number)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(user.id)
            .bind(&input.company_code)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(company)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List companies by name, optionally restricted to a single company.
    pub async fn list(pool: &PgPool, company_id: Option<DbId>) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies
             WHERE ($1::BIGINT IS NULL OR id = $1)
             ORDER BY name"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a company and, when email or password change, its login user.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
        password_hash: Option<&str>,
    ) -> Result<Option<Company>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE companies SET
                company_code = COALESCE($2, company_code),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.company_code)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(company) = company else {
            return Ok(None);
        };

        if input.email.is_some() || password_hash.is_some() {
            UserRepo::update_credentials_in_tx(
                &mut tx,
                company.user_id,
                input.email.as_deref(),
                password_hash,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(Some(company))
    }

    /// Delete a company and its owner account. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while projects or contractors still
    /// reference the company.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id: Option<DbId> =
            sqlx::query_scalar("DELETE FROM companies WHERE id = $1 RETURNING user_id")
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
