//! Route definitions for `/workers`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::worker;
use crate::state::AppState;

/// Routes mounted at `/workers`.
///
/// ```text
/// POST   /create    -> create
/// POST   /          -> create
/// GET    /          -> list (?project_id=, ?company_id=)
/// GET    /counts    -> counts (per contractor)
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(worker::list).post(worker::create))
        .route("/create", post(worker::create))
        .route("/counts", get(worker::counts))
        .route(
            "/{id}",
            get(worker::get_by_id)
                .put(worker::update)
                .delete(worker::delete),
        )
}
