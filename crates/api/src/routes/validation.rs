//! Route definitions for validation records.

use axum::routing::get;
use axum::Router;

use crate::handlers::validation;
use crate::state::AppState;

/// Routes mounted at `/validations`.
///
/// ```text
/// GET  /              -> history listing
/// POST /              -> submit a note for validation
/// GET  /{id}          -> record detail
/// GET  /{id}/wait     -> block until the record reaches a terminal state
/// GET  /{id}/details  -> normalized result details
/// GET  /{id}/report   -> plain-text report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(validation::list).post(validation::submit))
        .route("/{id}", get(validation::get_by_id))
        .route("/{id}/wait", get(validation::wait))
        .route("/{id}/details", get(validation::details))
        .route("/{id}/report", get(validation::report))
}
