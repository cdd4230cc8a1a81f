//! Handlers for the `/contractors` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use contrack_core::error::CoreError;
use contrack_core::roles::{Principal, Role};
use contrack_core::schedule::{clamp_window, expires_within, DEFAULT_EXPIRY_WARNING_DAYS};
use contrack_core::types::DbId;
use contrack_core::validation::validate_date_range;
use contrack_db::models::contractor::{
    Contractor, CreateContractor, ExpiringContractor, UpdateContractor,
};
use contrack_db::models::project::ProjectWithNames;
use contrack_db::repositories::{ContractorRepo, ProjectRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{hash_new_password, hash_password_change};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::{CompanyFilter, WindowParams};
use crate::response::DeletedResponse;
use crate::state::AppState;

/// Load a contractor and check it lies inside the caller's tenant.
pub(crate) async fn ensure_contractor_visible(
    state: &AppState,
    principal: &Principal,
    id: DbId,
) -> AppResult<Contractor> {
    let contractor = ContractorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Contractor", id))?;
    principal
        .scope()
        .ensure("Contractor", contractor.company_id, Some(contractor.id))?;
    Ok(contractor)
}

/// Company owners may only place contractors in their own company.
fn resolve_company(principal: &Principal, requested: Option<DbId>) -> AppResult<Option<DbId>> {
    if principal.role != Role::CompanyOwner {
        return Ok(requested);
    }
    match (principal.company_id, requested) {
        (Some(own), Some(other)) if own != other => Err(AppError::Core(CoreError::Forbidden(
            "Company owners may only manage contractors of their own company".into(),
        ))),
        (own, _) => Ok(own),
    }
}

/// POST /api/v1/contractors
///
/// Registers the contractor and its login user in one transaction.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(principal): RequireManager,
    Json(mut input): Json<CreateContractor>,
) -> AppResult<(StatusCode, Json<Contractor>)> {
    input.validate()?;
    validate_date_range(
        input.certificate_start,
        input.certificate_expiry,
        "certificate_start",
        "certificate_expiry",
    )?;
    input.company_id = resolve_company(&principal, input.company_id)?;

    let password_hash = hash_new_password(&input.password)?;
    let contractor = ContractorRepo::register(&state.pool, &input, &password_hash).await?;

    tracing::info!(
        contractor_id = contractor.id,
        contractor_code = %contractor.contractor_code,
        company_id = ?contractor.company_id,
        user_id = principal.user_id,
        "Contractor registered",
    );
    Ok((StatusCode::CREATED, Json(contractor)))
}

/// GET /api/v1/contractors
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<Contractor>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let contractors = ContractorRepo::list(&state.pool, company_id, contractor_id).await?;
    Ok(Json(contractors))
}

/// GET /api/v1/contractors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Contractor>> {
    let contractor = ensure_contractor_visible(&state, &principal, id).await?;
    Ok(Json(contractor))
}

/// PUT /api/v1/contractors/{id}
///
/// Managers edit contractors of their tenant; a contractor may edit its own
/// profile but not move itself to another company.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateContractor>,
) -> AppResult<Json<Contractor>> {
    input.validate()?;
    let existing = ensure_contractor_visible(&state, &principal, id).await?;

    match principal.role {
        Role::Admin => {}
        Role::CompanyOwner => {
            input.company_id = match input.company_id {
                Some(requested) => resolve_company(&principal, Some(requested))?,
                None => None,
            };
        }
        Role::Contractor if input.company_id.is_none() => {}
        _ => {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Role '{}' may not change this contractor",
                principal.role
            ))));
        }
    }

    validate_date_range(
        input.certificate_start.or(existing.certificate_start),
        input.certificate_expiry.or(existing.certificate_expiry),
        "certificate_start",
        "certificate_expiry",
    )?;

    let password_hash = hash_password_change(input.password.as_deref())?;
    let contractor = ContractorRepo::update(&state.pool, id, &input, password_hash.as_deref())
        .await?
        .ok_or(AppError::not_found("Contractor", id))?;

    tracing::info!(contractor_id = id, user_id = principal.user_id, "Contractor updated");
    Ok(Json(contractor))
}

/// DELETE /api/v1/contractors/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(principal): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    ensure_contractor_visible(&state, &principal, id).await?;
    if !ContractorRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Contractor", id));
    }
    tracing::info!(contractor_id = id, user_id = principal.user_id, "Contractor deleted");
    Ok(Json(DeletedResponse::new("Contractor", id)))
}

/// GET /api/v1/contractors/{id}/projects
pub async fn list_projects(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectWithNames>>> {
    ensure_contractor_visible(&state, &principal, id).await?;
    let (company_id, _) = principal.scope().filters(None);
    let projects = ProjectRepo::list(&state.pool, company_id, Some(id)).await?;
    Ok(Json(projects))
}

/// GET /api/v1/contractors/expiring?days=30
///
/// Contractors whose certificate or pre-qualification lapses within the
/// window. Already-expired credentials are included.
pub async fn list_expiring(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(window): Query<WindowParams>,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<ExpiringContractor>>> {
    let days = clamp_window(window.days, DEFAULT_EXPIRY_WARNING_DAYS);
    let today = Utc::now().date_naive();
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);

    let contractors = ContractorRepo::list_expiring(
        &state.pool,
        today + Duration::days(days),
        company_id,
        contractor_id,
    )
    .await?;

    let expiring = contractors
        .into_iter()
        .map(|contractor| ExpiringContractor {
            certificate_expiring: expires_within(contractor.certificate_expiry, today, days),
            prequal_expiring: expires_within(contractor.prequal_expiry, today, days),
            contractor,
        })
        .collect();
    Ok(Json(expiring))
}
