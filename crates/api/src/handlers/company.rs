//! Handlers for the `/companies` resource (company owners).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contrack_core::error::CoreError;
use contrack_core::roles::Principal;
use contrack_core::types::DbId;
use contrack_db::models::company::{Company, CreateCompany, UpdateCompany};
use contrack_db::repositories::CompanyRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{company_filter, hash_new_password, hash_password_change};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::query::CompanyFilter;
use crate::response::DeletedResponse;
use crate::state::AppState;

/// Load a company, rejecting callers outside its tenant with 403.
async fn ensure_company_visible(
    state: &AppState,
    principal: &Principal,
    id: DbId,
) -> AppResult<Company> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Company", id))?;
    match company_filter(principal, None) {
        Some(visible) if visible != company.id => Err(AppError::Core(CoreError::Forbidden(
            "Company belongs to another tenant".into(),
        ))),
        _ => Ok(company),
    }
}

/// POST /api/v1/companies
///
/// Registers the company and its owner login in one transaction.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<Company>)> {
    input.validate()?;
    let password_hash = hash_new_password(&input.password)?;
    let company = CompanyRepo::register(&state.pool, &input, &password_hash).await?;

    tracing::info!(
        company_id = company.id,
        company_code = %company.company_code,
        created_by = admin.user_id,
        "Company registered",
    );
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/v1/companies
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<CompanyFilter>,
) -> AppResult<Json<Vec<Company>>> {
    let companies =
        CompanyRepo::list(&state.pool, company_filter(&principal, params.company_id)).await?;
    Ok(Json(companies))
}

/// GET /api/v1/companies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Company>> {
    let company = ensure_company_visible(&state, &principal, id).await?;
    Ok(Json(company))
}

/// PUT /api/v1/companies/{id}
///
/// Owners may edit their own company; a changed email or password is carried
/// over to the login user.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(principal): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<Company>> {
    input.validate()?;
    ensure_company_visible(&state, &principal, id).await?;

    let password_hash = hash_password_change(input.password.as_deref())?;

    let company = CompanyRepo::update(&state.pool, id, &input, password_hash.as_deref())
        .await?
        .ok_or(AppError::not_found("Company", id))?;

    tracing::info!(company_id = id, user_id = principal.user_id, "Company updated");
    Ok(Json(company))
}

/// DELETE /api/v1/companies/{id}
///
/// Fails with 409 while contractors, officers or projects still reference it.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    if !CompanyRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Company", id));
    }
    tracing::info!(company_id = id, deleted_by = admin.user_id, "Company deleted");
    Ok(Json(DeletedResponse::new("Company", id)))
}
