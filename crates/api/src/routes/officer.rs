//! Route definitions for `/officers`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::officer;
use crate::state::AppState;

/// Routes mounted at `/officers`.
///
/// ```text
/// POST   /create    -> create
/// POST   /          -> create
/// GET    /          -> list
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(officer::list).post(officer::create))
        .route("/create", post(officer::create))
        .route(
            "/{id}",
            get(officer::get_by_id).put(officer::update).delete(officer::delete),
        )
}
