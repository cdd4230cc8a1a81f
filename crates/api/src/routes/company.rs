//! Route definitions for `/companies`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::company;
use crate::state::AppState;

/// Routes mounted at `/companies`.
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
        .route("/", get(company::list).post(company::create))
        .route("/create", post(company::create))
        .route(
            "/{id}",
            get(company::get_by_id).put(company::update).delete(company::delete),
        )
}
