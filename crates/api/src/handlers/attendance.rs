//! Handlers for the `/attendance` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contrack_core::error::CoreError;
use contrack_core::roles::Principal;
use contrack_core::types::DbId;
use contrack_db::models::attendance::{
    Attendance, AttendanceWithProject, CreateAttendance, ProjectAttendanceSummary,
    UpdateAttendance,
};
use contrack_db::repositories::{AttendanceRepo, WorkerRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::ensure_project_visible;
use crate::handlers::reject_officer;
use crate::middleware::rbac::RequireAuth;
use crate::query::{AttendanceFilter, CompanyFilter};
use crate::response::DeletedResponse;
use crate::state::AppState;

async fn ensure_attendance_visible(
    state: &AppState,
    principal: &Principal,
    id: DbId,
) -> AppResult<AttendanceWithProject> {
    let record = AttendanceRepo::find_with_project(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Attendance", id))?;
    principal
        .scope()
        .ensure("Attendance", Some(record.company_id), Some(record.contractor_id))?;
    Ok(record)
}

/// POST /api/v1/attendance
///
/// The worker's name, nationality and job title are copied onto the record.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Json(input): Json<CreateAttendance>,
) -> AppResult<(StatusCode, Json<Attendance>)> {
    reject_officer(&principal, "attendance")?;
    let project = ensure_project_visible(&state, &principal, input.project_id).await?;

    let worker = WorkerRepo::find_by_id(&state.pool, input.worker_id)
        .await?
        .ok_or(AppError::not_found("Worker", input.worker_id))?;
    if worker.contractor_id != project.contractor_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Worker {} does not work for the project's contractor",
            worker.id
        ))));
    }

    let record = AttendanceRepo::create(&state.pool, &input)
        .await?
        .ok_or(AppError::not_found("Worker", input.worker_id))?;

    tracing::info!(
        attendance_id = record.id,
        worker_id = record.worker_id,
        project_id = record.project_id,
        date = %record.date,
        user_id = principal.user_id,
        "Attendance recorded",
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/attendance
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<AttendanceFilter>,
) -> AppResult<Json<Vec<AttendanceWithProject>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let records = AttendanceRepo::list(
        &state.pool,
        company_id,
        contractor_id,
        params.project_id,
        params.date,
    )
    .await?;
    Ok(Json(records))
}

/// GET /api/v1/attendance/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<AttendanceWithProject>> {
    let record = ensure_attendance_visible(&state, &principal, id).await?;
    Ok(Json(record))
}

/// PUT /api/v1/attendance/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAttendance>,
) -> AppResult<Json<Attendance>> {
    reject_officer(&principal, "attendance")?;
    ensure_attendance_visible(&state, &principal, id).await?;

    let record = AttendanceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Attendance", id))?;

    tracing::info!(attendance_id = id, user_id = principal.user_id, "Attendance updated");
    Ok(Json(record))
}

/// DELETE /api/v1/attendance/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    reject_officer(&principal, "attendance")?;
    ensure_attendance_visible(&state, &principal, id).await?;
    if !AttendanceRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Attendance", id));
    }
    tracing::info!(attendance_id = id, user_id = principal.user_id, "Attendance deleted");
    Ok(Json(DeletedResponse::new("Attendance", id)))
}

/// GET /api/v1/attendance/summary
///
/// Per project: latest recorded date and present/absent totals.
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<ProjectAttendanceSummary>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let summary = AttendanceRepo::summary(&state.pool, company_id, contractor_id).await?;
    Ok(Json(summary))
}
