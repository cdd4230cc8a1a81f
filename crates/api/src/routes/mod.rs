pub mod attendance;
pub mod auth;
pub mod company;
pub mod contractor;
pub mod health;
pub mod officer;
pub mod payment;
pub mod project;
pub mod worker;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public, sets cookie)
/// /auth/logout                         logout (clears cookie)
/// /auth/me                             current principal
///
/// /companies                           list, create (admin)
/// /companies/{id}                      get, update, delete
///
/// /contractors                         list, create (manager)
/// /contractors/expiring                certificate / pre-qualification expiry
/// /contractors/{id}                    get, update, delete
/// /contractors/{id}/projects           projects of one contractor
///
/// /officers                            list, create (manager)
/// /officers/{id}                       get, update, delete
///
/// /projects                            list, create
/// /projects/counts                     project counts per contractor
/// /projects/safety-report              safety counters per contractor
/// /projects/upcoming                   scheduled work in the next days
/// /projects/{id}                       get, update, delete
/// /projects/{id}/safety-stats          counters of one project
///
/// /payments                            list, create (100% ceiling)
/// /payments/headroom/{project_id}      remaining percentage
/// /payments/{id}                       get, update, delete
///
/// /workers                             list, create
/// /workers/counts                      head counts per contractor
/// /workers/{id}                        get, update, delete
///
/// /attendance                          list, create
/// /attendance/summary                  latest date and totals per project
/// /attendance/{id}                     get, update, delete
/// ```
///
/// Every resource also accepts `POST /create` as an alias of `POST /`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/companies", company::router())
        .nest("/contractors", contractor::router())
        .nest("/officers", officer::router())
        .nest("/projects", project::router())
        .nest("/payments", payment::router())
        .nest("/workers", worker::router())
        .nest("/attendance", attendance::router())
}
