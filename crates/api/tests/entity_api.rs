//! HTTP-level tests for the CRUD resources, tenant scoping, role-conditional
//! project fields and the aggregation endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    admin_token, body_json, create_officer, create_project, delete, get, id_of, login,
    post_json, project_body, put_json, seed_tenant,
};
use serde_json::json;
use sqlx::PgPool;

async fn row_count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Create / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_alias_route(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;

    let body = project_body("ACME-P2", t.company_id, t.contractor_id);
    let response = post_json(&app, "/api/v1/projects/create", &admin, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "Active");
    assert_eq!(json["ytd_fai"], 0);
    assert_eq!(json["will_work_next_week"], false);

    let fetched = body_json(get(&app, &format!("/api/v1/projects/{}", id_of(&json)), &admin).await).await;
    assert_eq!(fetched["contractor_name"], "Contractor ACME-c");
    assert_eq!(fetched["company_name"], "Company ACME");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_rows_returns_404_and_changes_nothing(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    seed_tenant(&app, &admin, "ACME").await;

    for (resource, table) in [
        ("projects", "projects"),
        ("contractors", "contractors"),
        ("payments", "payments"),
        ("workers", "workers"),
    ] {
        let before = row_count(&pool, table).await;
        let response = delete(&app, &format!("/api/v1/{resource}/999999"), &admin).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{resource}");
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
        assert_eq!(row_count(&pool, table).await, before, "{resource}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_returns_id_and_message(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;

    let response = delete(&app, &format!("/api/v1/projects/{}", t.project_id), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], t.project_id);
    assert_eq!(json["message"], "Project deleted successfully");

    let response = get(&app, &format!("/api/v1/projects/{}", t.project_id), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_referenced_contractor_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;

    let response = delete(&app, &format!("/api/v1/contractors/{}", t.contractor_id), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
    assert_eq!(row_count(&pool, "contractors").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_project_number_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;

    let mut body = project_body("ACME-P1", t.company_id, t.contractor_id);
    body["name"] = json!("Overwrite attempt");
    let response = post_json(&app, "/api/v1/projects", &admin, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let original = body_json(get(&app, &format!("/api/v1/projects/{}", t.project_id), &admin).await).await;
    assert_eq!(original["name"], "Project ACME-P1");
    assert_eq!(row_count(&pool, "projects").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_dates_are_validated(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;

    let mut body = project_body("ACME-P2", t.company_id, t.contractor_id);
    body["end_date"] = json!("2025-01-01");
    let response = post_json(&app, "/api/v1/projects", &admin, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json(
        &app,
        &format!("/api/v1/projects/{}", t.project_id),
        &admin,
        json!({ "start_date": "2027-06-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_short_password_is_rejected_on_registration(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;

    let body = json!({
        "company_code": "ACME",
        "name": "Acme",
        "email": "owner@acme.test",
        "password": "short",
    });
    let response = post_json(&app, "/api/v1/companies", &admin, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(row_count(&pool, "companies").await, 0);
    assert_eq!(row_count(&pool, "users").await, 1);
}

// ---------------------------------------------------------------------------
// Tenant scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_company_owner_sees_only_own_projects(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let acme = seed_tenant(&app, &admin, "ACME").await;
    let beta = seed_tenant(&app, &admin, "BETA").await;

    let owner = login(&app, "ACME@owner.test").await;
    let list = body_json(get(&app, "/api/v1/projects", &owner).await).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["company_id"], acme.company_id);

    // Asking for another company does not widen the scope.
    let uri = format!("/api/v1/projects?company_id={}", beta.company_id);
    let list = body_json(get(&app, &uri, &owner).await).await;
    assert!(list.as_array().unwrap().iter().all(|p| p["company_id"] == acme.company_id));

    let response = get(&app, &format!("/api/v1/projects/{}", beta.project_id), &owner).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins see both.
    let list = body_json(get(&app, "/api/v1/projects", &admin).await).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_projects_are_pinned_to_own_company(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let acme = seed_tenant(&app, &admin, "ACME").await;
    let beta = seed_tenant(&app, &admin, "BETA").await;
    let owner = login(&app, "ACME@owner.test").await;

    let body = project_body("ACME-P2", beta.company_id, acme.contractor_id);
    let response = post_json(&app, "/api/v1/projects", &owner, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A contractor of another company cannot be assigned.
    let mut body = project_body("ACME-P3", acme.company_id, beta.contractor_id);
    body.as_object_mut().unwrap().remove("company_id");
    let response = post_json(&app, "/api/v1/projects", &owner, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = project_body("ACME-P4", acme.company_id, acme.contractor_id);
    body.as_object_mut().unwrap().remove("company_id");
    let response = post_json(&app, "/api/v1/projects", &owner, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["company_id"], acme.company_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contractor_sees_only_own_records(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let acme = seed_tenant(&app, &admin, "ACME").await;
    // A second contractor inside the same company.
    let other = id_of(&common::create_contractor(&app, &admin, "ACME-d", acme.company_id).await);
    create_project(&app, &admin, "ACME-P2", acme.company_id, other).await;

    let contractor = login(&app, "ACME-c@contractor.test").await;
    let list = body_json(get(&app, "/api/v1/projects", &contractor).await).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["contractor_id"], acme.contractor_id);

    let contractors = body_json(get(&app, "/api/v1/contractors", &contractor).await).await;
    assert_eq!(contractors.as_array().unwrap().len(), 1);

    let response = get(&app, &format!("/api/v1/contractors/{other}/projects"), &contractor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Role-conditional project fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_fields_from_the_wrong_role_are_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;
    create_officer(&app, &admin, "OFF1").await;
    let uri = format!("/api/v1/projects/{}", t.project_id);

    let contractor = login(&app, "ACME-c@contractor.test").await;
    let response = put_json(
        &app,
        &uri,
        &contractor,
        json!({ "role_fields": { "kind": "safety", "ytd_fai": 3 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let officer = login(&app, "OFF1@officer.test").await;
    let response = put_json(
        &app,
        &uri,
        &officer,
        json!({ "role_fields": { "kind": "schedule", "will_work_next_week": true } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Officers may not touch the base fields either.
    let response = put_json(&app, &uri, &officer, json!({ "name": "Renamed" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let owner = login(&app, "ACME@owner.test").await;
    let mut body = project_body("ACME-P2", t.company_id, t.contractor_id);
    body["role_fields"] = json!({ "kind": "schedule", "will_work_next_week": true });
    let response = post_json(&app, "/api/v1/projects", &owner, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let project = body_json(get(&app, &uri, &admin).await).await;
    assert_eq!(project["ytd_fai"], 0);
    assert_eq!(project["will_work_next_week"], false);
    assert_eq!(row_count(&pool, "projects").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_officer_and_contractor_write_their_own_fields(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;
    create_officer(&app, &admin, "OFF1").await;
    let uri = format!("/api/v1/projects/{}", t.project_id);

    let officer = login(&app, "OFF1@officer.test").await;
    let response = put_json(
        &app,
        &uri,
        &officer,
        json!({ "role_fields": {
            "kind": "safety",
            "safety_type": "NEAR-MISS",
            "incident_status": "under-investigation",
            "ytd_fai": 2,
            "total_not_closed": 1
        } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["safety_type"], "NEAR-MISS");
    assert_eq!(json["incident_status"], "under-investigation");
    assert_eq!(json["ytd_fai"], 2);

    let response = put_json(
        &app,
        &uri,
        &officer,
        json!({ "role_fields": { "kind": "safety", "ytd_incident": -1 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let contractor = login(&app, "ACME-c@contractor.test").await;
    let response = put_json(
        &app,
        &uri,
        &contractor,
        json!({ "role_fields": {
            "kind": "schedule",
            "scheduled_start": "2026-04-01",
            "scheduled_end": "2026-04-10",
            "will_work_next_week": true
        } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["will_work_next_week"], true);
    // Safety counters set by the officer are untouched.
    assert_eq!(json["ytd_fai"], 2);
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_counts_and_safety_report(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;
    let second = id_of(&create_project(&app, &admin, "ACME-P2", t.company_id, t.contractor_id).await);

    put_json(
        &app,
        &format!("/api/v1/projects/{second}"),
        &admin,
        json!({ "status": "Completed", "role_fields": { "kind": "safety", "ytd_fai": 4 } }),
    )
    .await;
    put_json(
        &app,
        &format!("/api/v1/projects/{}", t.project_id),
        &admin,
        json!({ "role_fields": { "kind": "safety", "ytd_fai": 1, "ytd_observation": 5 } }),
    )
    .await;

    let counts = body_json(get(&app, "/api/v1/projects/counts", &admin).await).await;
    let row = &counts.as_array().unwrap()[0];
    assert_eq!(row["contractor_id"], t.contractor_id);
    assert_eq!(row["total_projects"], 2);
    assert_eq!(row["active_projects"], 1);
    assert_eq!(row["completed_projects"], 1);

    let report = body_json(get(&app, "/api/v1/projects/safety-report", &admin).await).await;
    let row = &report.as_array().unwrap()[0];
    assert_eq!(row["ytd_fai"], 5);
    assert_eq!(row["ytd_observation"], 5);

    let stats = body_json(
        get(&app, &format!("/api/v1/projects/{second}/safety-stats"), &admin).await,
    )
    .await;
    assert_eq!(stats["project_id"], second);
    assert_eq!(stats["ytd_fai"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upcoming_schedule_window(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;
    let later = id_of(&create_project(&app, &admin, "ACME-P2", t.company_id, t.contractor_id).await);
    let today = Utc::now().date_naive();

    let schedule = |start: chrono::NaiveDate, end: chrono::NaiveDate| {
        json!({ "role_fields": {
            "kind": "schedule",
            "scheduled_start": start.to_string(),
            "scheduled_end": end.to_string(),
            "will_work_next_week": true
        } })
    };
    put_json(
        &app,
        &format!("/api/v1/projects/{}", t.project_id),
        &admin,
        schedule(today + Duration::days(2), today + Duration::days(20)),
    )
    .await;
    put_json(
        &app,
        &format!("/api/v1/projects/{later}"),
        &admin,
        schedule(today + Duration::days(30), today + Duration::days(40)),
    )
    .await;

    let upcoming = body_json(get(&app, "/api/v1/projects/upcoming", &admin).await).await;
    let ids: Vec<_> = upcoming.as_array().unwrap().iter().map(|p| p["id"].clone()).collect();
    assert_eq!(ids, vec![json!(t.project_id)]);

    let wide = body_json(get(&app, "/api/v1/projects/upcoming?days=45", &admin).await).await;
    assert_eq!(wide.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_worker_counts_and_attendance_summary(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;

    let mut worker_ids = Vec::new();
    for (number, nationality, job_title) in [
        ("W1", "Saudi", "Welder"),
        ("W2", "Non-Saudi", "Welder"),
        ("W3", "Non-Saudi", "HVAC"),
    ] {
        let response = post_json(
            &app,
            "/api/v1/workers",
            &admin,
            json!({
                "worker_number": number,
                "name": format!("Worker {number}"),
                "nationality": nationality,
                "job_title": job_title,
                "contractor_id": t.contractor_id,
                "project_id": t.project_id,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        worker_ids.push(id_of(&body_json(response).await));
    }

    let counts = body_json(get(&app, "/api/v1/workers/counts", &admin).await).await;
    let row = &counts.as_array().unwrap()[0];
    assert_eq!(row["total_workers"], 3);
    assert_eq!(row["saudi_workers"], 1);
    assert_eq!(row["non_saudi_workers"], 2);
    assert_eq!(row["welder_workers"], 2);
    assert_eq!(row["hvac_workers"], 1);

    for (worker_id, date, status) in [
        (worker_ids[0], "2026-03-01", "Present"),
        (worker_ids[1], "2026-03-01", "Absent"),
        (worker_ids[0], "2026-03-02", "Present"),
    ] {
        let response = post_json(
            &app,
            "/api/v1/attendance",
            &admin,
            json!({
                "worker_id": worker_id,
                "project_id": t.project_id,
                "date": date,
                "status": status,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Same worker, project and date again.
    let response = post_json(
        &app,
        "/api/v1/attendance",
        &admin,
        json!({
            "worker_id": worker_ids[0],
            "project_id": t.project_id,
            "date": "2026-03-01",
            "status": "Absent",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let summary = body_json(get(&app, "/api/v1/attendance/summary", &admin).await).await;
    let row = &summary.as_array().unwrap()[0];
    assert_eq!(row["project_id"], t.project_id);
    assert_eq!(row["project_name"], "Project ACME-P1");
    assert_eq!(row["latest_date"], "2026-03-02");
    assert_eq!(row["attendance_count"], 2);
    assert_eq!(row["absence_count"], 1);

    let day = body_json(
        get(&app, "/api/v1/attendance?date=2026-03-01", &admin).await,
    )
    .await;
    let day = day.as_array().unwrap();
    assert_eq!(day.len(), 2);
    assert!(day.iter().all(|a| a["project_name"] == "Project ACME-P1"));
    assert!(day.iter().any(|a| a["worker_name"] == "Worker W2" && a["nationality"] == "Non-Saudi"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expiring_contractors(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let t = seed_tenant(&app, &admin, "ACME").await;
    let today = Utc::now().date_naive();

    put_json(
        &app,
        &format!("/api/v1/contractors/{}", t.contractor_id),
        &admin,
        json!({
            "certificate_start": (today - Duration::days(300)).to_string(),
            "certificate_expiry": (today + Duration::days(10)).to_string(),
            "prequal_expiry": (today + Duration::days(200)).to_string(),
        }),
    )
    .await;

    let expiring = body_json(get(&app, "/api/v1/contractors/expiring", &admin).await).await;
    let list = expiring.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], t.contractor_id);
    assert_eq!(list[0]["certificate_expiring"], true);
    assert_eq!(list[0]["prequal_expiring"], false);

    let narrow = body_json(get(&app, "/api/v1/contractors/expiring?days=5", &admin).await).await;
    assert!(narrow.as_array().unwrap().is_empty());
}
