//! Repository for the `officers` table.

use contrack_core::roles::ROLE_OFFICER;
use contrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::officer::{CreateOfficer, Officer, UpdateOfficer};
use crate::models::user::CreateUser;
use crate::repositories::UserRepo;

const COLUMNS: &str =
    "id, user_id, company_id, officer_code, name, email, phone_number, created_at, updated_at";

/// Provides CRUD operations for safety officers and their login accounts.
pub struct OfficerRepo;

impl OfficerRepo {
    /// Create the officer's login user and profile row in one transaction.
    pub async fn register(
        pool: &PgPool,
        input: &CreateOfficer,
        password_hash: &str,
    ) -> Result<Officer, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = UserRepo::create_in_tx(
            &mut tx,
            &CreateUser {
                email: input.email.clone(),
                password_hash: password_hash.to_string(),
                role: ROLE_OFFICER.to_string(),
            },
        )
        .await?;

        let query = format!(
            "INSERT INTO officers (user_id, company_id, officer_code, name, email, phone_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let officer = sqlx::query_as::<_, Officer>(&query)
            .bind(user.id)
            .bind(input.company_id)
            .bind(&input.officer_code)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(officer)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Officer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM officers WHERE id = $1");
        sqlx::query_as::<_, Officer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List officers by name, optionally restricted to one company.
    pub async fn list(pool: &PgPool, company_id: Option<DbId>) -> Result<Vec<Officer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM officers
             WHERE ($1::BIGINT IS NULL OR company_id = $1)
             ORDER BY name"
        );
        sqlx::query_as::<_, Officer>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update an officer and, when email or password change, its login user.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOfficer,
        password_hash: Option<&str>,
    ) -> Result<Option<Officer>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE officers SET
                officer_code = COALESCE($2, officer_code),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number),
                company_id = COALESCE($6, company_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let officer = sqlx::query_as::<_, Officer>(&query)
            .bind(id)
            .bind(&input.officer_code)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(input.company_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(officer) = officer else {
            return Ok(None);
        };

        if input.email.is_some() || password_hash.is_some() {
            UserRepo::update_credentials_in_tx(
                &mut tx,
                officer.user_id,
                input.email.as_deref(),
                password_hash,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(Some(officer))
    }

    /// Delete an officer and its login account. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id: Option<DbId> =
            sqlx::query_scalar("DELETE FROM officers WHERE id = $1 RETURNING user_id")
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
