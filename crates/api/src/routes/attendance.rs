//! Route definitions for `/attendance`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// POST   /create    -> create
/// POST   /          -> create
/// GET    /          -> list (?project_id=, ?date=, ?company_id=)
/// GET    /summary   -> summary (per project)
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(attendance::list).post(attendance::create))
        .route("/create", post(attendance::create))
        .route("/summary", get(attendance::summary))
        .route(
            "/{id}",
            get(attendance::get_by_id)
                .put(attendance::update)
                .delete(attendance::delete),
        )
}
