//! Route definitions for `/payments`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST   /create                  -> create
/// POST   /                        -> create
/// GET    /                        -> list (?project_id=, ?company_id=)
/// GET    /headroom/{project_id}   -> headroom
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payment::list).post(payment::create))
        .route("/create", post(payment::create))
        .route("/headroom/{project_id}", get(payment::headroom))
        .route(
            "/{id}",
            get(payment::get_by_id)
                .put(payment::update)
                .delete(payment::delete),
        )
}
