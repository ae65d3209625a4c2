//! Route definitions for the admin reports overview.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /validations               -> cross-user overview
/// POST   /validations/{id}/archive  -> archive record
/// DELETE /validations/{id}          -> purge record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validations", get(admin::list))
        .route("/validations/{id}/archive", post(admin::archive))
        .route("/validations/{id}", delete(admin::delete))
}
