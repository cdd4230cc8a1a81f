//! Checks on the migrated schema that the API layer relies on: constraint
//! naming (the error classifier maps `uq_` violations to 409), RESTRICT
//! deletes (referenced rows surface as 409 rather than vanishing), enum labels
//! matching the Rust types, and the per-row payment bound.

use contrack_core::payment::{
    PAYMENT_STATUS_PAID, PAYMENT_STATUS_REJECTED, PAYMENT_STATUS_SUBMITTED,
    PAYMENT_STATUS_UNDER_APPROVAL,
};
use contrack_core::roles::{ROLE_ADMIN, ROLE_COMPANY_OWNER, ROLE_CONTRACTOR, ROLE_OFFICER};
use sqlx::PgPool;

const TABLES: [&str; 8] = [
    "attendance",
    "companies",
    "contractors",
    "officers",
    "payments",
    "projects",
    "users",
    "workers",
];

async fn enum_labels(pool: &PgPool, type_name: &str) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT e.enumlabel::TEXT
         FROM pg_enum e
         JOIN pg_type t ON t.oid = e.enumtypid
         WHERE t.typname = $1
         ORDER BY e.enumsortorder",
    )
    .bind(type_name)
    .fetch_all(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_every_table_has_bigint_id_and_timestamps(pool: PgPool) {
    for table in TABLES {
        let columns: Vec<(String, String)> = sqlx::query_as(
            "SELECT column_name::TEXT, data_type::TEXT
             FROM information_schema.columns
             WHERE table_schema = 'public'
               AND table_name = $1
               AND column_name IN ('id', 'created_at', 'updated_at')
             ORDER BY column_name",
        )
        .bind(table)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(
            columns,
            vec![
                ("created_at".to_string(), "timestamp with time zone".to_string()),
                ("id".to_string(), "bigint".to_string()),
                ("updated_at".to_string(), "timestamp with time zone".to_string()),
            ],
            "table {table}"
        );

        let trigger: Option<String> = sqlx::query_scalar(
            "SELECT trigger_name::TEXT FROM information_schema.triggers
             WHERE event_object_table = $1 AND trigger_name = 'trg_' || $1 || '_updated_at'
             LIMIT 1",
        )
        .bind(table)
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(trigger.is_some(), "table {table} has no updated_at trigger");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints_use_uq_prefix(pool: PgPool) {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT constraint_name::TEXT
         FROM information_schema.table_constraints
         WHERE table_schema = 'public' AND constraint_type = 'UNIQUE'
         ORDER BY constraint_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(names.contains(&"uq_projects_project_number".to_string()));
    assert!(names.contains(&"uq_attendance_worker_project_date".to_string()));
    for name in &names {
        assert!(name.starts_with("uq_"), "unique constraint {name} lacks the uq_ prefix");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_keys_restrict_delete_and_are_indexed(pool: PgPool) {
    let fks: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT tc.table_name::TEXT, kcu.column_name::TEXT, rc.delete_rule::TEXT
         FROM information_schema.referential_constraints rc
         JOIN information_schema.table_constraints tc
             ON rc.constraint_name = tc.constraint_name
            AND rc.constraint_schema = tc.table_schema
         JOIN information_schema.key_column_usage kcu
             ON kcu.constraint_name = tc.constraint_name
            AND kcu.table_schema = tc.table_schema
         WHERE rc.constraint_schema = 'public'
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(fks.contains(&(
        "payments".to_string(),
        "project_id".to_string(),
        "RESTRICT".to_string()
    )));
    for (table, column, rule) in &fks {
        assert_eq!(rule, "RESTRICT", "{table}.{column} must not cascade");

        let indexed: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || ')%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(indexed, "FK column {table}.{column} has no index");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enum_labels_match_application_names(pool: PgPool) {
    assert_eq!(
        enum_labels(&pool, "payment_status").await,
        [
            PAYMENT_STATUS_PAID,
            PAYMENT_STATUS_SUBMITTED,
            PAYMENT_STATUS_UNDER_APPROVAL,
            PAYMENT_STATUS_REJECTED,
        ]
    );
    assert_eq!(
        enum_labels(&pool, "project_status").await,
        ["Active", "Expired", "Completed"]
    );
    assert_eq!(
        enum_labels(&pool, "incident_status").await,
        ["open", "closed", "under-investigation"]
    );
    assert_eq!(enum_labels(&pool, "nationality").await, ["Saudi", "Non-Saudi"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_roles_are_constrained(pool: PgPool) {
    for role in [ROLE_ADMIN, ROLE_COMPANY_OWNER, ROLE_CONTRACTOR, ROLE_OFFICER] {
        sqlx::query("INSERT INTO users (email, password_hash, role) VALUES ($1, 'x', $2)")
            .bind(format!("{role}@schema.test"))
            .bind(role)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("role {role} rejected: {e}"));
    }

    let err = sqlx::query("INSERT INTO users (email, password_hash, role) VALUES ('x@schema.test', 'x', 'superuser')")
        .execute(&pool)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.code()).as_deref(),
        Some("23514")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_amount_is_bounded_per_row(pool: PgPool) {
    let (clause,): (String,) = sqlx::query_as(
        "SELECT pg_get_constraintdef(oid) FROM pg_constraint WHERE conname = 'ck_payments_amount'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(clause.contains(">= (0)") || clause.contains(">= 0"), "got: {clause}");
    assert!(clause.contains("<= (100)") || clause.contains("<= 100"), "got: {clause}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_amount_is_stored_to_two_decimals(pool: PgPool) {
    let (data_type, scale): (String, Option<i32>) = sqlx::query_as(
        "SELECT data_type::TEXT, numeric_scale::INT FROM information_schema.columns \
         WHERE table_name = 'payments' AND column_name = 'amount'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(data_type, "numeric");
    assert_eq!(scale, Some(2));
}
