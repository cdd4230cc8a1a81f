//! Handlers for the `/payments` resource.
//!
//! Every write that changes a project's cumulative percentage runs in one
//! transaction that first locks the project row, so two concurrent
//! submissions for the same project are checked one after the other.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contrack_core::error::CoreError;
use contrack_core::payment::PaymentLedger;
use contrack_core::roles::Principal;
use contrack_core::types::DbId;
use contrack_db::models::payment::{
    CreatePayment, Payment, PaymentHeadroom, PaymentWithNames, UpdatePayment,
};
use contrack_db::models::project::Project;
use contrack_db::repositories::{PaymentRepo, ProjectRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::project::ensure_project_visible;
use crate::handlers::reject_officer;
use crate::middleware::rbac::RequireAuth;
use crate::query::ProjectFilter;
use crate::response::DeletedResponse;
use crate::state::AppState;

/// Lock the project row for the rest of `tx` and check the caller may touch it.
async fn lock_project(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    principal: &Principal,
    project_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::lock_for_update(tx, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))?;
    principal
        .scope()
        .ensure("Project", Some(project.company_id), Some(project.contractor_id))?;
    Ok(project)
}

/// Fold the project's other payments into a ledger and add `amount`.
async fn check_ceiling(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    project_id: DbId,
    exclude: Option<DbId>,
    amount: f64,
) -> AppResult<()> {
    let amounts = PaymentRepo::amounts_for_project(&mut **tx, project_id, exclude).await?;
    let ledger = PaymentLedger::from_amounts(amounts);
    if let Err(err) = ledger.accrue(amount) {
        if let CoreError::PaymentCeiling { existing_sum, .. } = &err {
            tracing::warn!(
                project_id,
                existing_sum,
                requested = amount,
                headroom = ledger.headroom(),
                "Payment rejected: ceiling exceeded",
            );
        }
        return Err(err.into());
    }
    Ok(())
}

/// POST /api/v1/payments
///
/// Records a payment if the project's cumulative percentage stays at or
/// below 100. Rejections carry `existing_sum` and `headroom`.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Json(input): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    reject_officer(&principal, "payment")?;
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    let project = lock_project(&mut tx, &principal, input.project_id).await?;

    if input.contractor_id.is_some_and(|c| c != project.contractor_id) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "contractor_id must be the project's contractor ({})",
            project.contractor_id
        ))));
    }
    if input.company_id.is_some_and(|c| c != project.company_id) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "company_id must be the project's company ({})",
            project.company_id
        ))));
    }

    check_ceiling(&mut tx, project.id, None, input.amount).await?;

    let payment = PaymentRepo::create_in_tx(
        &mut tx,
        project.contractor_id,
        Some(project.company_id),
        &input,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        payment_id = payment.id,
        project_id = project.id,
        amount = payment.amount,
        user_id = principal.user_id,
        "Payment recorded",
    );
    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET /api/v1/payments
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Query(params): Query<ProjectFilter>,
) -> AppResult<Json<Vec<PaymentWithNames>>> {
    let (company_id, contractor_id) = principal.scope().filters(params.company_id);
    let payments =
        PaymentRepo::list(&state.pool, company_id, contractor_id, params.project_id).await?;
    Ok(Json(payments))
}

/// GET /api/v1/payments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<PaymentWithNames>> {
    let payment = PaymentRepo::find_with_names(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Payment", id))?;
    ensure_project_visible(&state, &principal, payment.payment.project_id).await?;
    Ok(Json(payment))
}

/// PUT /api/v1/payments/{id}
///
/// A changed `amount` is re-checked against the ceiling with this payment
/// left out of the existing sum.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePayment>,
) -> AppResult<Json<Payment>> {
    reject_officer(&principal, "payment")?;
    input.validate()?;

    let existing = PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Payment", id))?;

    let mut tx = state.pool.begin().await?;
    let project = lock_project(&mut tx, &principal, existing.project_id).await?;

    if let Some(amount) = input.amount {
        check_ceiling(&mut tx, project.id, Some(id), amount).await?;
    }

    let payment = PaymentRepo::update_in_tx(&mut tx, id, &input)
        .await?
        .ok_or(AppError::not_found("Payment", id))?;
    tx.commit().await?;

    tracing::info!(
        payment_id = id,
        project_id = project.id,
        amount = payment.amount,
        user_id = principal.user_id,
        "Payment updated",
    );
    Ok(Json(payment))
}

/// DELETE /api/v1/payments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    reject_officer(&principal, "payment")?;
    let payment = PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Payment", id))?;
    ensure_project_visible(&state, &principal, payment.project_id).await?;

    if !PaymentRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Payment", id));
    }
    tracing::info!(payment_id = id, user_id = principal.user_id, "Payment deleted");
    Ok(Json(DeletedResponse::new("Payment", id)))
}

/// GET /api/v1/payments/headroom/{project_id}
pub async fn headroom(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<PaymentHeadroom>> {
    ensure_project_visible(&state, &principal, project_id).await?;
    let amounts = PaymentRepo::amounts_for_project(&state.pool, project_id, None).await?;
    let ledger = PaymentLedger::from_amounts(amounts);

    Ok(Json(PaymentHeadroom {
        project_id,
        existing_sum: ledger.existing_sum(),
        headroom: ledger.headroom(),
        payment_count: ledger.payment_count(),
    }))
}
