//! Handlers for the `/projects` resource and its per-contractor reports.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use contrack_core::error::CoreError;
use contrack_core::roles::{ensure_can_write, Principal, Role};
use contrack_core::schedule::{clamp_window, is_upcoming, DEFAULT_UPCOMING_DAYS};
use contrack_core::types::DbId;
use contrack_core::validation::{require_non_empty, validate_counter, validate_date_range};
use contrack_db::models::project::{
    ContractorProjectCount, ContractorSafetyReport, CreateProject, Project, ProjectRoleFields,
    ProjectSafetyStats, ProjectWithNames, UpdateProject,
};
use contrack_db::repositories::{ContractorRepo, ProjectRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::reject_officer;
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::{CompanyFilter, WindowParams};
use crate::response::DeletedResponse;
use crate::state::AppState;

/// Load a project and check it lies inside the caller's tenant.
pub(crate) async fn ensure_project_visible(
    state: &AppState,
    principal: &Principal,
    id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    principal
        .scope()
        .ensure("Project", Some(project.company_id), Some(project.contractor_id))?;
    Ok(project)
}

/// Permission and value checks for the role-conditional field group.
///
/// `existing` supplies the stored schedule bounds on update so that a
/// one-sided change is still checked against the other side.
fn check_role_fields(
    principal: &Principal,
    role_fields: Option<&ProjectRoleFields>,
    existing: Option<&Project>,
) -> AppResult<()> {
    let Some(fields) = role_fields else {
        return Ok(());
    };
    ensure_can_write(principal.role, fields.kind())?;

    match fields {
        ProjectRoleFields::Safety(safety) => {
            for (name, value) in safety.counters() {
                if let Some(value) = value {
                    validate_counter(value, name)?;
                }
            }
        }
        ProjectRoleFields::Schedule(schedule) => {
            validate_date_range(
                schedule
                    .scheduled_start
                    .or(existing.and_then(|p| p.scheduled_start)),
                schedule
                    .scheduled_end
                    .or(existing.and_then(|p| p.scheduled_end)),
                "scheduled_start",
                "scheduled_end",
            )?;
        }
    }
    Ok(())
}

fn missing(field: &str) -> AppError {
    AppError::Core(CoreError::Validation(format!("{field} is required")))
}

/// Decide the owning company and assigned contractor of a new project.
///
/// Owners are pinned to their company and contractors to themselves; the
/// contractor must not belong to a different company.
async fn resolve_ownership(
    state: &AppState,
    principal: &Principal,
    input: &CreateProject,
) -> AppResult<(DbId, DbId)> {
    let forbidden = |msg: &str| AppError::Core(CoreError::Forbidden(msg.into()));

    let (company_id, contractor_id) = match principal.role {
        Role::CompanyOwner => {
            let own = principal
                .company_id
                .ok_or_else(|| forbidden("Company owner has no company profile"))?;
            if input.company_id.is_some_and(|c| c != own) {
                return Err(forbidden("Projects can only be created for your own company"));
            }
            (own, input.contractor_id.ok_or_else(|| missing("contractor_id"))?)
        }
        Role::Contractor => {
            let own = principal
                .contractor_id
                .ok_or_else(|| forbidden("Contractor has no contractor profile"))?;
            if input.contractor_id.is_some_and(|c| c != own) {
                return Err(forbidden("Contractors can only create their own projects"));
            }
            let company = principal
                .company_id
                .or(input.company_id)
                .ok_or_else(|| missing("company_id"))?;
            (company, own)
        }
        Role::Admin | Role::Officer => (
            input.company_id.ok_or_else(|| missing("company_id"))?,
            input.contractor_id.ok_or_else(|| missing("contractor_id"))?,
        ),
    };

    check_contractor_company(state, contractor_id, company_id).await?;
    Ok((company_id, contractor_id))
}

async fn check_contractor_company(
    state: &AppState,
    contractor_id: DbId,
    company_id: DbId,
) -> AppResult<()> {
    let contractor = ContractorRepo::find_by_id(&state.pool, contractor_id)
        .await?
        .ok_or(AppError::not_found("Contractor", contractor_id))?;
    if contractor.company_id.is_some_and(|c| c != company_id) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Contractor {contractor_id} does not work for company {company_id}"
        ))));
    }
    Ok(())
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    reject_officer(&principal, "project")?;
    input.validate()?;
    require_non_empty(&input.name, "name")?;
    require_non_empty(&input.project_number, "project_number")?;
    validate_date_range(
        Some(input.start_date),
        Some(input.end_date),
        "start_date",
        "end_date",
    )?;
    check_role_fields(&principal, input.role_fields.as_ref(), None)?;

    let (company_id, contractor_id) = resolve_ownership(&state, &principal, &input).await?;
    let project = ProjectRepo::create(&state.pool, company_id, contractor_id, &input).await?;

    tracing::info!(
        project_id = project.id,
        project_number = %project.project_number,
        company_id,
        contractor_id,
        user_id = principal.user_id,
        "Project created",
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<ProjectWithNames>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let projects = ProjectRepo::list(&state.pool, company_id, contractor_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithNames>> {
    ensure_project_visible(&state, &principal, id).await?;
    let project = ProjectRepo::find_with_names(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
///
/// Officers may only send `role_fields` of kind `safety`.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    let existing = ensure_project_visible(&state, &principal, id).await?;

    if principal.role == Role::Officer && input.changes_base_fields() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Officers may only update safety fields".into(),
        )));
    }
    check_role_fields(&principal, input.role_fields.as_ref(), Some(&existing))?;

    validate_date_range(
        Some(input.start_date.unwrap_or(existing.start_date)),
        Some(input.end_date.unwrap_or(existing.end_date)),
        "start_date",
        "end_date",
    )?;

    if let Some(contractor_id) = input.contractor_id {
        if principal.role == Role::Contractor && Some(contractor_id) != principal.contractor_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Contractors cannot reassign projects".into(),
            )));
        }
        check_contractor_company(&state, contractor_id, existing.company_id).await?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Project", id))?;

    tracing::info!(
        project_id = id,
        role_fields = input.role_fields.as_ref().map(|f| f.kind().as_str()),
        user_id = principal.user_id,
        "Project updated",
    );
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Fails with 409 while payments, workers or attendance reference the project.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(principal): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    ensure_project_visible(&state, &principal, id).await?;
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Project", id));
    }
    tracing::info!(project_id = id, user_id = principal.user_id, "Project deleted");
    Ok(Json(DeletedResponse::new("Project", id)))
}

/// GET /api/v1/projects/counts
pub async fn counts(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<ContractorProjectCount>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let counts = ProjectRepo::counts_by_contractor(&state.pool, company_id, contractor_id).await?;
    Ok(Json(counts))
}

/// GET /api/v1/projects/safety-report
pub async fn safety_report(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<ContractorSafetyReport>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let report = ProjectRepo::safety_report(&state.pool, company_id, contractor_id).await?;
    Ok(Json(report))
}

/// GET /api/v1/projects/{id}/safety-stats
pub async fn safety_stats(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectSafetyStats>> {
    let project = ensure_project_visible(&state, &principal, id).await?;
    Ok(Json(ProjectSafetyStats::from(&project)))
}

/// GET /api/v1/projects/upcoming?days=7
///
/// Projects whose contractor schedule touches `[today, today + days]`.
pub async fn upcoming(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(window): Query<WindowParams>,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<ProjectWithNames>>> {
    let days = clamp_window(window.days, DEFAULT_UPCOMING_DAYS);
    let today = Utc::now().date_naive();
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);

    let projects = ProjectRepo::list_scheduled(&state.pool, company_id, contractor_id)
        .await?
        .into_iter()
        .filter(|p| {
            is_upcoming(
                p.project.scheduled_start,
                p.project.scheduled_end,
                today,
                days,
            )
        })
        .collect();
    Ok(Json(projects))
}
