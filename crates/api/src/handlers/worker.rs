//! Handlers for the `/workers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contrack_core::error::CoreError;
use contrack_core::roles::{Principal, Role};
use contrack_core::types::DbId;
use contrack_db::models::worker::{
    ContractorWorkerCounts, CreateWorker, UpdateWorker, Worker, WorkerWithContractor,
};
use contrack_db::repositories::{ProjectRepo, WorkerRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::contractor::ensure_contractor_visible;
use crate::handlers::reject_officer;
use crate::middleware::rbac::RequireAuth;
use crate::query::{CompanyFilter, ProjectFilter};
use crate::response::DeletedResponse;
use crate::state::AppState;

async fn ensure_worker_visible(
    state: &AppState,
    principal: &Principal,
    id: DbId,
) -> AppResult<WorkerWithContractor> {
    let worker = WorkerRepo::find_with_contractor(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Worker", id))?;
    principal
        .scope()
        .ensure("Worker", worker.company_id, Some(worker.worker.contractor_id))?;
    Ok(worker)
}

/// A worker may only be placed on a project of its own contractor.
async fn check_project_assignment(
    state: &AppState,
    contractor_id: DbId,
    project_id: Option<DbId>,
) -> AppResult<()> {
    let Some(project_id) = project_id else {
        return Ok(());
    };
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))?;
    if project.contractor_id != contractor_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Project {project_id} is not assigned to contractor {contractor_id}"
        ))));
    }
    Ok(())
}

/// POST /api/v1/workers
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Json(input): Json<CreateWorker>,
) -> AppResult<(StatusCode, Json<Worker>)> {
    reject_officer(&principal, "worker")?;
    input.validate()?;

    let contractor_id = match principal.role {
        Role::Contractor => principal.contractor_id,
        _ => input.contractor_id,
    }
    .ok_or_else(|| AppError::Core(CoreError::Validation("contractor_id is required".into())))?;
    ensure_contractor_visible(&state, &principal, contractor_id).await?;
    check_project_assignment(&state, contractor_id, input.project_id).await?;

    let worker = WorkerRepo::create(&state.pool, contractor_id, &input).await?;

    tracing::info!(
        worker_id = worker.id,
        worker_number = %worker.worker_number,
        contractor_id,
        user_id = principal.user_id,
        "Worker created",
    );
    Ok((StatusCode::CREATED, Json(worker)))
}

/// GET /api/v1/workers
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<ProjectFilter>,
) -> AppResult<Json<Vec<WorkerWithContractor>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let workers =
        WorkerRepo::list(&state.pool, company_id, contractor_id, params.project_id).await?;
    Ok(Json(workers))
}

/// GET /api/v1/workers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<WorkerWithContractor>> {
    let worker = ensure_worker_visible(&state, &principal, id).await?;
    Ok(Json(worker))
}

/// PUT /api/v1/workers/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorker>,
) -> AppResult<Json<Worker>> {
    reject_officer(&principal, "worker")?;
    input.validate()?;
    let existing = ensure_worker_visible(&state, &principal, id).await?;
    check_project_assignment(&state, existing.worker.contractor_id, input.project_id).await?;

    let worker = WorkerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Worker", id))?;

    tracing::info!(worker_id = id, user_id = principal.user_id, "Worker updated");
    Ok(Json(worker))
}

/// DELETE /api/v1/workers/{id}
///
/// Fails with 409 while attendance records reference the worker.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    reject_officer(&principal, "worker")?;
    ensure_worker_visible(&state, &principal, id).await?;
    if !WorkerRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Worker", id));
    }
    tracing::info!(worker_id = id, user_id = principal.user_id, "Worker deleted");
    Ok(Json(DeletedResponse::new("Worker", id)))
}

/// GET /api/v1/workers/counts
///
/// Per contractor: total, Saudi, Non-Saudi and per-job-title head counts.
pub async fn counts(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<ContractorWorkerCounts>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let counts = WorkerRepo::counts_by_contractor(&state.pool, company_id, contractor_id).await?;
    Ok(Json(counts))
}
