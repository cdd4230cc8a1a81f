//! Repository for the `users` table.
//!
//! Profile tables (`companies`, `contractors`, `officers`) own their login
//! row; the transactional helpers here are called from their repositories so
//! that a profile and its user are always written together.

use contrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserProfileIds};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role, is_active, \
                        last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let user = Self::create_in_tx(&mut tx, input).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Insert a new user inside an existing transaction.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the profile rows attached to a user.
    ///
    /// `company_id` is the owned company for company owners, otherwise the
    /// company the contractor or officer profile belongs to.
    pub async fn profile_ids(pool: &PgPool, user_id: DbId) -> Result<UserProfileIds, sqlx::Error> {
        sqlx::query_as::<_, UserProfileIds>(
            "SELECT
                COALESCE(
                    (SELECT id FROM companies WHERE user_id = $1),
                    (SELECT company_id FROM contractors WHERE user_id = $1),
                    (SELECT company_id FROM officers WHERE user_id = $1)
                ) AS company_id,
                (SELECT id FROM contractors WHERE user_id = $1) AS contractor_id,
                (SELECT id FROM officers WHERE user_id = $1) AS officer_id",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Change the login email and/or password hash of a user.
    ///
    /// `None` leaves the column unchanged.
    pub async fn update_credentials_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash)
             WHERE id = $1",
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Delete a user row inside an existing transaction.
    pub async fn delete_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter by 1.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET failed_login_count = failed_login_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
