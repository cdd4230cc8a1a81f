//! Route definitions for `/contractors`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contractor;
use crate::state::AppState;

/// Routes mounted at `/contractors`.
///
/// ```text
/// POST   /create              -> create
/// POST   /                    -> create
/// GET    /                    -> list
/// GET    /expiring            -> list_expiring (?days=30)
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// GET    /{id}/projects       -> list_projects
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contractor::list).post(contractor::create))
        .route("/create", post(contractor::create))
        .route("/expiring", get(contractor::list_expiring))
        .route(
            "/{id}",
            get(contractor::get_by_id)
                .put(contractor::update)
                .delete(contractor::delete),
        )
        .route("/{id}/projects", get(contractor::list_projects))
}
