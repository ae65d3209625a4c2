//! Route definitions for the validator dispatch proxy.

use axum::routing::post;
use axum::Router;

use crate::handlers::validator_proxy;
use crate::state::AppState;

/// Routes mounted at `/validator`.
///
/// ```text
/// POST /trigger -> forward a raw dispatch payload to the engine
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/trigger", post(validator_proxy::trigger))
}
