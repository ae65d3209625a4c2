//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for the validation history listing
/// (`?user_id=&limit=`).
///
/// `limit` is clamped in the repository layer.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for list endpoints that only take a `?limit=`.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
