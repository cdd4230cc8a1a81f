//! Route definitions for `/projects`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /create              -> create
/// POST   /                    -> create
/// GET    /                    -> list
/// GET    /counts              -> counts (per contractor)
/// GET    /safety-report       -> safety_report (per contractor)
/// GET    /upcoming            -> upcoming (?days=7)
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// GET    /{id}/safety-stats   -> safety_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/create", post(project::create))
        .route("/counts", get(project::counts))
        .route("/safety-report", get(project::safety_report))
        .route("/upcoming", get(project::upcoming))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/safety-stats", get(project::safety_stats))
}
