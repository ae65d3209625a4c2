pub mod admin;
pub mod health;
pub mod validation;
pub mod validator;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /validations                          submit (POST), history (GET)
/// /validations/{id}                     record detail (GET)
/// /validations/{id}/wait                block until terminal (GET)
/// /validations/{id}/details             normalized details (GET)
/// /validations/{id}/report              plain-text report (GET)
///
/// /validator/trigger                    raw dispatch proxy (POST)
///
/// /webhooks/validator                   terminal result callback (POST)
///
/// /admin/validations                    cross-user overview (GET)
/// /admin/validations/{id}/archive       archive record (POST)
/// /admin/validations/{id}               purge record (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/validations", validation::router())
        .nest("/validator", validator::router())
        .nest("/webhooks", webhook::router())
        .nest("/admin", admin::router())
}
