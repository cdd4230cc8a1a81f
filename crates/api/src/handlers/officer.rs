//! Handlers for the `/officers` resource (safety officers).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contrack_core::error::CoreError;
use contrack_core::roles::{Principal, Role};
use contrack_core::types::DbId;
use contrack_db::models::officer::{CreateOfficer, Officer, UpdateOfficer};
use contrack_db::repositories::OfficerRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{company_filter, hash_new_password, hash_password_change};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::CompanyFilter;
use crate::response::DeletedResponse;
use crate::state::AppState;

async fn ensure_officer_visible(
    state: &AppState,
    principal: &Principal,
    id: DbId,
) -> AppResult<Officer> {
    let officer = OfficerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Officer", id))?;
    if let Some(visible) = company_filter(principal, None) {
        if officer.company_id != Some(visible) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Officer belongs to another tenant".into(),
            )));
        }
    }
    Ok(officer)
}

/// Pin an owner's officers to the owner's company.
fn pin_company(principal: &Principal, requested: Option<DbId>) -> AppResult<Option<DbId>> {
    if principal.role != Role::CompanyOwner {
        return Ok(requested);
    }
    match requested {
        Some(id) if Some(id) != principal.company_id => Err(AppError::Core(
            CoreError::Forbidden("Company owners may only manage their own officers".into()),
        )),
        _ => Ok(principal.company_id),
    }
}

/// POST /api/v1/officers
pub async fn create(
    State(state): State<AppState>,
    RequireManager(principal): RequireManager,
    Json(mut input): Json<CreateOfficer>,
) -> AppResult<(StatusCode, Json<Officer>)> {
    input.validate()?;
    input.company_id = pin_company(&principal, input.company_id)?;

    let password_hash = hash_new_password(&input.password)?;
    let officer = OfficerRepo::register(&state.pool, &input, &password_hash).await?;

    tracing::info!(
        officer_id = officer.id,
        officer_code = %officer.officer_code,
        user_id = principal.user_id,
        "Officer registered",
    );
    Ok((StatusCode::CREATED, Json(officer)))
}

/// GET /api/v1/officers
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<Officer>>> {
    let officers =
        OfficerRepo::list(&state.pool, company_filter(&principal, params.company_id)).await?;
    Ok(Json(officers))
}

/// GET /api/v1/officers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Officer>> {
    let officer = ensure_officer_visible(&state, &principal, id).await?;
    Ok(Json(officer))
}

/// PUT /api/v1/officers/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(principal): RequireManager,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateOfficer>,
) -> AppResult<Json<Officer>> {
    input.validate()?;
    ensure_officer_visible(&state, &principal, id).await?;
    if input.company_id.is_some() {
        input.company_id = pin_company(&principal, input.company_id)?;
    }

    let password_hash = hash_password_change(input.password.as_deref())?;
    let officer = OfficerRepo::update(&state.pool, id, &input, password_hash.as_deref())
        .await?
        .ok_or(AppError::not_found("Officer", id))?;

    tracing::info!(officer_id = id, user_id = principal.user_id, "Officer updated");
    Ok(Json(officer))
}

/// DELETE /api/v1/officers/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(principal): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    ensure_officer_visible(&state, &principal, id).await?;
    if !OfficerRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Officer", id));
    }
    tracing::info!(officer_id = id, user_id = principal.user_id, "Officer deleted");
    Ok(Json(DeletedResponse::new("Officer", id)))
}
