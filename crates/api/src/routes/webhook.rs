//! Route definitions for inbound validator callbacks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /validator -> terminal result callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/validator", post(webhook::receive_result))
}
